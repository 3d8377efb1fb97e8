//! sqlforge: dry-run SQL generation from mapping files.
//!
//! # Usage
//!
//! ```bash
//! # SELECT with a filter and sort
//! sqlforge select person.toml --where "Age>=18" --sort Name:asc
//!
//! # Second page of 20, for PostgreSQL
//! sqlforge --dialect postgres page person.toml --sort Id --page 1 --page-size 20
//!
//! # One UPDATE per --where, as JSON
//! sqlforge --format json bulk-update person.toml --where Id=1 --where Id=2
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use sqlforge::config::load_mapping;
use sqlforge::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlforge")]
#[command(version)]
#[command(about = "Dialect-aware SQL generation from table mappings", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlforge insert person.toml
    sqlforge --dialect postgres select person.toml --where 'Name~A%' --sort Age:desc
    sqlforge bulk-insert person.toml person.toml customer.json")]
struct Cli {
    /// SQL dialect (overrides the config file)
    #[arg(short, long, value_enum, env = "SQLFORGE_DIALECT")]
    dialect: Option<DialectKind>,

    /// Config file (default: ./sqlforge.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct Filter {
    /// Filter as Prop<op>value; ops: = <> != > >= < <= ~ (LIKE)
    #[arg(short, long = "where", value_name = "FILTER")]
    filters: Vec<String>,
}

#[derive(Args)]
struct Sorting {
    /// Sort key as Prop[:asc|:desc]
    #[arg(short, long, value_name = "SORT")]
    sort: Vec<Sort>,
}

#[derive(Subcommand)]
enum Commands {
    /// SELECT all mapped columns
    Select {
        mapping: PathBuf,
        #[command(flatten)]
        filter: Filter,
        #[command(flatten)]
        sorting: Sorting,
    },
    /// SELECT COUNT(*)
    Count {
        mapping: PathBuf,
        #[command(flatten)]
        filter: Filter,
    },
    /// One zero-based page of an ordered SELECT
    Page {
        mapping: PathBuf,
        #[command(flatten)]
        filter: Filter,
        #[command(flatten)]
        sorting: Sorting,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// A window of an ordered SELECT
    Window {
        mapping: PathBuf,
        #[command(flatten)]
        filter: Filter,
        #[command(flatten)]
        sorting: Sorting,
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
    /// INSERT one row
    Insert { mapping: PathBuf },
    /// Multi-row INSERT, one row per mapping argument
    BulkInsert {
        #[arg(required = true)]
        mappings: Vec<PathBuf>,
    },
    /// UPDATE rows matching the filter
    Update {
        mapping: PathBuf,
        #[command(flatten)]
        filter: Filter,
        /// Never SET key columns, including trigger identities
        #[arg(long)]
        all_keys: bool,
    },
    /// One UPDATE per --where filter
    BulkUpdate {
        mapping: PathBuf,
        #[command(flatten)]
        filter: Filter,
        #[arg(long)]
        all_keys: bool,
    },
    /// DELETE rows matching the filter
    Delete {
        mapping: PathBuf,
        #[command(flatten)]
        filter: Filter,
    },
    /// Identity retrieval statement
    Identity { mapping: PathBuf },
    /// List supported dialects
    Dialects,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sqlforge=debug" } else { "sqlforge=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Dialects = cli.command {
        show_dialects();
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }
    let generator = SqlGenerator::from_config(&config);
    if cli.verbose {
        eprintln!("{} {}", "Dialect:".dimmed(), config.dialect.to_string().cyan());
    }

    let mut params = Parameters::new();
    let sql = match &cli.command {
        Commands::Select { mapping, filter, sorting } => {
            let map = read_mapping(mapping)?;
            let predicate = filter.predicate()?;
            generator.build_select(&map, predicate.as_deref(), &sorting.sort, &mut params)?
        }
        Commands::Count { mapping, filter } => {
            let map = read_mapping(mapping)?;
            let predicate = filter.predicate()?;
            generator.build_count(&map, predicate.as_deref(), &mut params)?
        }
        Commands::Page { mapping, filter, sorting, page, page_size } => {
            let map = read_mapping(mapping)?;
            let predicate = filter.predicate()?;
            generator.build_paged(
                &map,
                predicate.as_deref(),
                &sorting.sort,
                *page,
                *page_size,
                &mut params,
            )?
        }
        Commands::Window { mapping, filter, sorting, offset, limit } => {
            let map = read_mapping(mapping)?;
            let predicate = filter.predicate()?;
            generator.build_windowed(
                &map,
                predicate.as_deref(),
                &sorting.sort,
                *offset,
                *limit,
                &mut params,
            )?
        }
        Commands::Insert { mapping } => generator.build_insert(&read_mapping(mapping)?)?,
        Commands::BulkInsert { mappings } => {
            let maps = mappings
                .iter()
                .map(|p| read_mapping(p))
                .collect::<Result<Vec<_>>>()?;
            let refs: Vec<&TableMap> = maps.iter().collect();
            generator.build_bulk_insert(&refs)?
        }
        Commands::Update { mapping, filter, all_keys } => {
            let map = read_mapping(mapping)?;
            let predicate = filter.predicate()?;
            generator.build_update(&map, predicate.as_deref(), &mut params, *all_keys)?
        }
        Commands::BulkUpdate { mapping, filter, all_keys } => {
            let map = read_mapping(mapping)?;
            let predicates = filter.each()?;
            generator.build_bulk_update(&map, &predicates, &mut params, *all_keys)?
        }
        Commands::Delete { mapping, filter } => {
            let map = read_mapping(mapping)?;
            let predicate = filter.predicate()?;
            generator.build_delete(&map, predicate.as_deref(), &mut params)?
        }
        Commands::Identity { mapping } => generator.build_identity_sql(&read_mapping(mapping)?)?,
        Commands::Dialects => unreachable!(), // Handled above
    };

    print_output(&sql, &params, cli.format)?;
    if sql.contains(";\n") && !generator.supports_multiple_statements() {
        eprintln!(
            "{}",
            format!("⚠ {} cannot run these statements as one batch", config.dialect).yellow()
        );
    }
    Ok(())
}

fn read_mapping(path: &Path) -> Result<TableMap> {
    load_mapping(path).with_context(|| format!("reading mapping {}", path.display()))
}

impl Filter {
    /// All filters AND-ed together, or `None` when there are none.
    fn predicate(&self) -> Result<Option<Box<dyn Predicate>>> {
        let mut predicates = self.each()?;
        Ok(match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(and(predicates).boxed()),
        })
    }

    /// One predicate per filter.
    fn each(&self) -> Result<Vec<Box<dyn Predicate>>> {
        self.filters
            .iter()
            .map(|f| parse_filter(f).map(|p| p.boxed()))
            .collect()
    }
}

/// Parse `Prop<op>value`. Two-character operators are tried first.
fn parse_filter(input: &str) -> Result<FieldPredicate> {
    const OPS: [(&str, Operator, bool); 9] = [
        (">=", Operator::Ge, false),
        ("<=", Operator::Le, false),
        ("<>", Operator::Eq, true),
        ("!=", Operator::Eq, true),
        ("=", Operator::Eq, false),
        (">", Operator::Gt, false),
        ("<", Operator::Lt, false),
        ("~", Operator::Like, false),
        ("!~", Operator::Like, true),
    ];

    let found = OPS
        .iter()
        .filter_map(|(sym, op, not)| input.find(sym).map(|pos| (pos, *sym, *op, *not)))
        .min_by_key(|(pos, sym, ..)| (*pos, std::cmp::Reverse(sym.len())));

    let Some((pos, sym, op, not)) = found else {
        bail!("invalid filter '{}': expected Prop<op>value", input);
    };
    let property = input[..pos].trim();
    if property.is_empty() {
        bail!("invalid filter '{}': missing property", input);
    }
    let value = parse_value(input[pos + sym.len()..].trim());
    Ok(FieldPredicate {
        property: property.to_string(),
        op,
        value,
        not,
    })
}

fn parse_value(raw: &str) -> SqlValue {
    // Try to parse as number, otherwise use as string
    if raw.eq_ignore_ascii_case("null") {
        SqlValue::Null
    } else if raw == "true" {
        SqlValue::Bool(true)
    } else if raw == "false" {
        SqlValue::Bool(false)
    } else if let Ok(n) = raw.parse::<i64>() {
        SqlValue::Int(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        SqlValue::Float(f)
    } else {
        let unquoted = raw
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(raw);
        SqlValue::Text(unquoted.to_string())
    }
}

fn print_output(sql: &str, params: &Parameters, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "sql": sql, "params": params });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", "Generated SQL:".green().bold());
            println!("{}", sql.white());
            if !params.is_empty() {
                println!();
                println!("{}", "Parameters:".cyan());
                for (name, value) in params.sorted() {
                    println!("  {} = {}", name, value.to_string().yellow());
                }
            }
        }
    }
    Ok(())
}

fn show_dialects() {
    println!(
        "{:12} {:8} {:8} {}",
        "Dialect".white().bold(),
        "Quotes".white().bold(),
        "Params".white().bold(),
        "Batches".white().bold()
    );
    println!("{}", "─".repeat(44).dimmed());
    for kind in DialectKind::ALL {
        let d = kind.dialect();
        println!(
            "{:12} {:8} {:8} {}",
            kind.to_string().cyan().bold(),
            format!("{}x{}", d.open_quote(), d.close_quote()),
            format!("{}name", d.parameter_prefix()),
            if d.supports_multiple_statements() { "yes".green() } else { "no".red() }
        );
    }
}
