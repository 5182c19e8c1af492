#![deny(missing_docs)]
//! Cosmoport command-line interface.
//!
//! Lists, counts, and edits ships through a running Cosmoport server.

mod client;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::ShipClient;
use cosmoport_core::{PageRequest, Ship, ShipDraft, ShipFilter, ShipOrder, ShipType};
use std::fmt::Write;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "cosmoport", version, about = "Cosmoport ship registry CLI")]
struct Cli {
    /// Base URL of the Cosmoport server.
    #[arg(long, global = true, env = "COSMOPORT_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring of the ship name.
    #[arg(long)]
    name: Option<String>,
    /// Substring of the planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (TRANSPORT, MILITARY, MERCHANT).
    #[arg(long = "type", value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Earliest production date (YYYY-MM-DD, RFC 3339, or epoch millis).
    #[arg(long, value_parser = parse_date)]
    after: Option<DateTime<Utc>>,
    /// Latest production date (YYYY-MM-DD, RFC 3339, or epoch millis).
    #[arg(long, value_parser = parse_date)]
    before: Option<DateTime<Utc>>,
    /// Used flag.
    #[arg(long)]
    used: Option<bool>,
    /// Minimum speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Maximum speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Minimum crew size.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Maximum crew size.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Minimum rating.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum rating.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl From<FilterArgs> for ShipFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            name: args.name,
            planet: args.planet,
            ship_type: args.ship_type,
            after: args.after.map(|date| date.timestamp_millis()),
            before: args.before.map(|date| date.timestamp_millis()),
            is_used: args.used,
            min_speed: args.min_speed,
            max_speed: args.max_speed,
            min_crew_size: args.min_crew_size,
            max_crew_size: args.max_crew_size,
            min_rating: args.min_rating,
            max_rating: args.max_rating,
        }
    }
}

#[derive(Args, Clone, Debug)]
struct PageArgs {
    /// Sort field (ID, SPEED, DATE, RATING, CREW_SIZE).
    #[arg(long, value_parser = parse_order, default_value = "ID")]
    order: ShipOrder,
    /// Zero-based page index.
    #[arg(long, default_value_t = 0)]
    page_number: u32,
    /// Ships per page.
    #[arg(long, default_value_t = 3)]
    page_size: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        Self {
            order: args.order,
            page_number: args.page_number,
            page_size: args.page_size,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct ShipArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (TRANSPORT, MILITARY, MERCHANT).
    #[arg(long = "type", value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Production date (YYYY-MM-DD, RFC 3339, or epoch millis).
    #[arg(long, value_parser = parse_date)]
    prod_date: Option<DateTime<Utc>>,
    /// Used flag.
    #[arg(long)]
    used: Option<bool>,
    /// Speed between 0.01 and 0.99.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size between 1 and 9999.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl From<ShipArgs> for ShipDraft {
    fn from(args: ShipArgs) -> Self {
        Self {
            name: args.name,
            planet: args.planet,
            ship_type: args.ship_type,
            prod_date: args.prod_date,
            is_used: args.used,
            speed: args.speed,
            crew_size: args.crew_size,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show a single ship.
    Get {
        /// Ship id.
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
    /// Register a new ship.
    Create {
        #[command(flatten)]
        fields: ShipArgs,
    },
    /// Change some fields of a ship.
    Update {
        /// Ship id.
        #[arg(allow_hyphen_values = true)]
        id: String,
        #[command(flatten)]
        fields: ShipArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship id.
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
}

fn parse_ship_type(raw: &str) -> Result<ShipType, String> {
    raw.parse()
        .map_err(|_| format!("unknown ship type {raw:?}, expected TRANSPORT, MILITARY or MERCHANT"))
}

fn parse_order(raw: &str) -> Result<ShipOrder, String> {
    raw.parse().map_err(|_| {
        format!("unknown order {raw:?}, expected ID, SPEED, DATE, RATING or CREW_SIZE")
    })
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| format!("timestamp {millis} is out of range"));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("cannot parse date {raw:?}"))
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = ShipClient::new(&cli.server_url)?;
    let output = execute(&client, cli.command, cli.format).await?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
fn main() {}

/// Run a subcommand against the server and render its result.
async fn execute(client: &ShipClient, command: Commands, format: OutputFormat) -> CliResult<String> {
    match command {
        Commands::List { filter, page } => {
            let ships = client.list(&filter.into(), &page.into()).await?;
            match format {
                OutputFormat::Text => Ok(render_ships_text(&ships)),
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&ships)?),
            }
        }
        Commands::Count { filter } => {
            let total = client.count(&filter.into()).await?;
            match format {
                OutputFormat::Text => Ok(format!("{total} ships")),
                OutputFormat::Json => Ok(total.to_string()),
            }
        }
        Commands::Get { id } => render_ship(&client.get(&id).await?, format),
        Commands::Create { fields } => render_ship(&client.create(&fields.into()).await?, format),
        Commands::Update { id, fields } => {
            render_ship(&client.update(&id, &fields.into()).await?, format)
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            match format {
                OutputFormat::Text => Ok(format!("Deleted ship {}.", id.trim())),
                OutputFormat::Json => Ok(serde_json::json!({ "deleted": id.trim() }).to_string()),
            }
        }
    }
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(render_ship_line(ship)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ship)?),
    }
}

fn render_ship_line(ship: &Ship) -> String {
    format!(
        "#{} {} ({}) {} built {} {} speed={:.2} crew={} rating={:.2}",
        ship.id,
        ship.name,
        ship.planet,
        ship.ship_type,
        ship.prod_date.format("%Y-%m-%d"),
        if ship.is_used { "used" } else { "new" },
        ship.speed,
        ship.crew_size,
        ship.rating
    )
}

fn render_ships_text(ships: &[Ship]) -> String {
    if ships.is_empty() {
        return "No ships found.".to_string();
    }
    let mut output = String::new();
    for ship in ships {
        let _ = writeln!(output, "{}", render_ship_line(ship));
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{DELETE, GET};
    use httpmock::MockServer;
    use serde_json::json;

    fn sample_ship() -> Ship {
        Ship {
            id: 1,
            name: "Enterprise".to_string(),
            planet: "Earth".to_string(),
            ship_type: ShipType::Military,
            prod_date: Utc.with_ymd_and_hms(2900, 6, 15, 12, 0, 0).unwrap(),
            is_used: false,
            speed: 0.5,
            crew_size: 100,
            rating: 0.33,
        }
    }

    #[test]
    fn parse_date_accepts_supported_forms() {
        let expected = Utc.with_ymd_and_hms(2995, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2995-03-01").expect("date"), expected);
        assert_eq!(parse_date("2995-03-01T00:00:00Z").expect("rfc3339"), expected);
        assert_eq!(
            parse_date(&expected.timestamp_millis().to_string()).expect("millis"),
            expected
        );
        assert!(parse_date("March").is_err());
    }

    #[test]
    fn parsers_reject_unknown_labels() {
        assert_eq!(parse_ship_type("merchant"), Ok(ShipType::Merchant));
        assert!(parse_ship_type("yacht").is_err());
        assert_eq!(parse_order("crew_size"), Ok(ShipOrder::CrewSize));
        assert!(parse_order("colour").is_err());
    }

    #[test]
    fn cli_parses_list_arguments() {
        let cli = Cli::try_parse_from([
            "cosmoport",
            "list",
            "--type",
            "TRANSPORT",
            "--used",
            "true",
            "--order",
            "RATING",
            "--page-size",
            "10",
            "--format",
            "json",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Json);
        let Commands::List { filter, page } = cli.command else {
            panic!("expected list");
        };
        let filter = ShipFilter::from(filter);
        assert_eq!(filter.ship_type, Some(ShipType::Transport));
        assert_eq!(filter.is_used, Some(true));
        let page = PageRequest::from(page);
        assert_eq!(page.order, ShipOrder::Rating);
        assert_eq!(page.page_number, 0);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn cli_keeps_negative_ids_for_the_server() {
        let cli = Cli::try_parse_from(["cosmoport", "get", "-1"]).expect("parse");
        let Commands::Get { id } = cli.command else {
            panic!("expected get");
        };
        assert_eq!(id, "-1");
    }

    #[test]
    fn ship_args_become_partial_draft() {
        let draft = ShipDraft::from(ShipArgs {
            planet: Some("Vulcan".to_string()),
            used: Some(true),
            ..ShipArgs::default()
        });
        assert_eq!(draft.planet.as_deref(), Some("Vulcan"));
        assert_eq!(draft.is_used, Some(true));
        assert!(draft.name.is_none());
    }

    #[test]
    fn text_rendering_lists_ship_fields() {
        let line = render_ship_line(&sample_ship());
        assert_eq!(
            line,
            "#1 Enterprise (Earth) MILITARY built 2900-06-15 new speed=0.50 crew=100 rating=0.33"
        );
        assert_eq!(render_ships_text(&[]), "No ships found.");
    }

    #[tokio::test]
    async fn execute_renders_list_and_count() {
        let server = MockServer::start_async().await;
        let list = server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/ships");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!([sample_ship()]));
            })
            .await;
        let count = server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/ships/count");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("1");
            })
            .await;

        let client = ShipClient::new(&server.base_url()).expect("client");
        let page = PageArgs {
            order: ShipOrder::Id,
            page_number: 0,
            page_size: 3,
        };
        let output = execute(
            &client,
            Commands::List {
                filter: FilterArgs::default(),
                page,
            },
            OutputFormat::Json,
        )
        .await
        .expect("list");
        let ships: Vec<Ship> = serde_json::from_str(&output).expect("json");
        assert_eq!(ships, vec![sample_ship()]);

        let output = execute(
            &client,
            Commands::Count {
                filter: FilterArgs::default(),
            },
            OutputFormat::Text,
        )
        .await
        .expect("count");
        assert_eq!(output, "1 ships");

        list.assert_async().await;
        count.assert_async().await;
    }

    #[tokio::test]
    async fn execute_reports_delete() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/ships/5");
                then.status(200);
            })
            .await;

        let client = ShipClient::new(&server.base_url()).expect("client");
        let output = execute(
            &client,
            Commands::Delete {
                id: "5".to_string(),
            },
            OutputFormat::Text,
        )
        .await
        .expect("delete");

        assert_eq!(output, "Deleted ship 5.");
        mock.assert_async().await;
    }
}
