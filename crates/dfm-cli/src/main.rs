use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dfm_cli::{drive, parse_script, render_slot, replay, slot_sizes, stdout_sink, SharedPage};
use dfm_wizard::{open_page, Autosave, Page, Session, WizardConfig, WizardContext};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let config = Arg::new("config")
        .long("config")
        .global(true)
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file");
    let store = Arg::new("store")
        .long("store")
        .global(true)
        .value_parser(value_parser!(PathBuf))
        .help("Slot store directory (overrides the configuration)");
    let page = Arg::new("page")
        .long("page")
        .required(true)
        .value_parser(value_parser!(Page))
        .help("Page slug, e.g. dfm-config");

    Command::new("dfm-intake")
        .version(dfm_cli::VERSION)
        .about("DFM intake wizard host")
        .arg_required_else_help(true)
        .arg(config)
        .arg(store)
        .subcommand(Command::new("pages").about("List wizard pages"))
        .subcommand(
            Command::new("replay")
                .about("Apply a script of inputs to a page, printing events as JSON lines")
                .arg(page.clone())
                .arg(
                    Arg::new("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array or JSON-lines file of inputs"),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Drive a page from stdin with autosave running")
                .arg(page),
        )
        .subcommand(
            Command::new("slots")
                .about("List stored slots")
                .arg(
                    Arg::new("sizes")
                        .long("sizes")
                        .action(ArgAction::SetTrue)
                        .help("Show value sizes in bytes"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Print one slot")
                .arg(Arg::new("key").required(true).help("Slot key")),
        )
}

fn load_config(matches: &ArgMatches) -> Result<WizardConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => WizardConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => WizardConfig::default(),
    };
    if let Some(dir) = matches.get_one::<PathBuf>("store") {
        config = config.with_store_dir(dir);
    }
    config.validate()?;
    Ok(config)
}

fn page_arg(args: &ArgMatches) -> Result<Page> {
    match args.get_one::<Page>("page") {
        Some(page) => Ok(*page),
        None => bail!("--page is required"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("pages", _)) => {
            for page in Page::ALL {
                let kind = if page.has_form() { "form" } else { "shell" };
                println!("{:<22} {kind}", page.slug());
            }
        }
        Some(("replay", args)) => {
            let page = page_arg(args)?;
            let Some(path) = args.get_one::<PathBuf>("script") else {
                bail!("script path is required");
            };
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let inputs = parse_script(&text)?;

            let ctx = WizardContext::open(config)?;
            let mut sink = stdout_sink();
            let mut session = Session::open(page, ctx, &mut sink)?;
            let report = replay(&mut session, inputs, &mut sink).await;
            if let Some(next) = report.navigated {
                eprintln!("navigate: {next}");
            }
        }
        Some(("run", args)) => {
            let page = page_arg(args)?;
            let period = config.autosave_interval();
            let ctx = WizardContext::open(config)?;

            let mut sink = stdout_sink();
            let mut controller = open_page(page, ctx)?;
            controller.load(&mut sink);
            let shared: SharedPage = Arc::new(Mutex::new(controller));

            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            let autosave = Autosave::spawn(shared.clone(), period, tx);
            let printer = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    println!("{}", dfm_cli::event_line(&event));
                }
            });

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let report = drive(&shared, stdin, &mut sink).await?;
            autosave.abort();
            printer.abort();

            tracing::info!(
                applied = report.applied,
                rejected = report.rejected,
                "input closed"
            );
            if let Some(next) = report.navigated {
                eprintln!("navigate: {next}");
            }
        }
        Some(("slots", args)) => {
            let ctx = WizardContext::open(config)?;
            let show_sizes = args.get_flag("sizes");
            for (key, size) in slot_sizes(ctx.store())? {
                if show_sizes {
                    println!("{key:<36} {size:>8}");
                } else {
                    println!("{key}");
                }
            }
        }
        Some(("show", args)) => {
            let Some(key) = args.get_one::<String>("key") else {
                bail!("slot key is required");
            };
            let ctx = WizardContext::open(config)?;
            match render_slot(ctx.store(), key)? {
                Some(value) => println!("{value}"),
                None => bail!("slot {key} is empty"),
            }
        }
        _ => {}
    }
    Ok(())
}
