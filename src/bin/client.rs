//! Command line client: triggers a feed fetch and prints one page of products.

use clap::{Parser, ValueEnum};
use dotenvy::dotenv;

use pushkind_pricefeed::dto::products::{
    Direction, ErrorResponse, FetchRequest, FetchResponse, Field, ListRequest, ListResponse,
    Paging, Sorting,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FieldArg {
    Default,
    Name,
    Price,
    Updated,
}

impl From<FieldArg> for Field {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::Default => Field::Default,
            FieldArg::Name => Field::Name,
            FieldArg::Price => Field::Price,
            FieldArg::Updated => Field::Updated,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Asc => Direction::Asc,
            DirectionArg::Desc => Direction::Desc,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pricefeed-client", about = "Fetch a price feed and list products")]
struct Args {
    /// Base URL of the price feed server.
    #[arg(long, default_value = "http://127.0.0.1:50051")]
    addr: String,
    /// Feed to ingest before listing. Pass an empty string to skip fetching.
    #[arg(long, default_value = "https://csv-samples.s3.amazonaws.com/dummy.csv")]
    fetch_url: String,
    #[arg(long, default_value_t = 5)]
    limit: i64,
    #[arg(long, value_enum, default_value_t = FieldArg::Name)]
    field: FieldArg,
    #[arg(long, value_enum, default_value_t = DirectionArg::Desc)]
    direction: DirectionArg,
    /// Continue after this product id.
    #[arg(long)]
    cursor: Option<String>,
}

fn post<Req, Resp>(
    client: &reqwest::blocking::Client,
    url: &str,
    body: &Req,
) -> Result<Resp, String>
where
    Req: serde::Serialize,
    Resp: serde::de::DeserializeOwned,
{
    let response = client
        .post(url)
        .json(body)
        .send()
        .map_err(|e| format!("request failed: {e}"))?;

    let status = response.status();
    if status.is_success() {
        response
            .json::<Resp>()
            .map_err(|e| format!("invalid response: {e}"))
    } else {
        let message = response
            .json::<ErrorResponse>()
            .map(|e| e.error)
            .unwrap_or_default();
        Err(format!("{status}: {message}"))
    }
}

fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let client = reqwest::blocking::Client::new();
    let base = args.addr.trim_end_matches('/');

    if !args.fetch_url.is_empty() {
        let request = FetchRequest {
            url: args.fetch_url.clone(),
        };
        if let Err(e) = post::<_, FetchResponse>(&client, &format!("{base}/v1/fetch"), &request) {
            log::error!("Fetch failed: {e}");
            std::process::exit(1);
        }
    }

    let request = ListRequest {
        paging: Some(Paging {
            cursor_id: args.cursor,
            limit: Some(args.limit),
        }),
        sorting: Some(Sorting {
            field: args.field.into(),
            direction: args.direction.into(),
        }),
    };

    let response: ListResponse = match post(&client, &format!("{base}/v1/list"), &request) {
        Ok(response) => response,
        Err(e) => {
            log::error!("List failed: {e}");
            std::process::exit(1);
        }
    };

    println!("{}", response.last_id);
    for p in response.products {
        println!(
            "{} | {:.2} | {} | {}",
            p.name, p.price, p.num_of_changes, p.last_update
        );
    }
}
