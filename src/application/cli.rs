use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use dialoguer::Password;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatRequest;
use crate::domain::models::Credentials;
use crate::domain::models::Registration;
use crate::domain::services::actions::help_text;
use crate::infrastructure::api::ApiManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn prompt_credentials(ask_matches: &ArgMatches) -> Result<Credentials> {
    let mut email = Config::get(ConfigKey::Email);
    if email.is_empty() {
        email = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .interact_text()?;
    }

    let password = match ask_matches.get_one::<String>("password") {
        Some(password) if !password.is_empty() => password.to_string(),
        _ => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };

    return Ok(Credentials::new(&email, &password));
}

/// Logs in, sends one query and prints the reply without starting the UI.
async fn ask(ask_matches: &ArgMatches) -> Result<()> {
    let query = ask_matches
        .get_many::<String>("query")
        .map(|words| return words.map(|e| return e.as_str()).collect::<Vec<&str>>())
        .unwrap_or_default()
        .join(" ");
    if query.trim().is_empty() {
        bail!("A query is required");
    }

    let credentials = prompt_credentials(ask_matches)?;
    if !credentials.is_complete() {
        bail!("Email and password are required");
    }

    let api = ApiManager::get();
    let token = match api.login(&credentials).await? {
        Some(token) => token,
        None => bail!("Login failed for {}", credentials.email),
    };

    let request = ChatRequest::new(&query);
    let reply = match ask_matches.get_one::<String>("agent") {
        Some(agent) => api.call_agent(&token, agent, &request).await?,
        None => api.chat(&token, &request).await?,
    };

    let output = reply.as_lines().join("\n");
    if reply.is_failure() {
        eprintln!("{}", Paint::red(output));
    } else {
        println!("{output}");
    }

    return Ok(());
}

fn prompt_text(matches: &ArgMatches, id: &str, prompt: &str) -> Result<String> {
    if let Some(value) = matches.get_one::<String>(id) {
        if !value.trim().is_empty() {
            return Ok(value.to_string());
        }
    }

    return Ok(Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()?);
}

fn prompt_registration(register_matches: &ArgMatches) -> Result<Registration> {
    let mut email = Config::get(ConfigKey::Email);
    if email.is_empty() {
        email = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .interact_text()?;
    }

    let full_name = prompt_text(register_matches, "full-name", "Full name")?;
    let phone_number = match register_matches.get_one::<String>("phone-number") {
        Some(phone_number) => phone_number.to_string(),
        None => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Phone number (optional)")
            .allow_empty(true)
            .interact_text()?,
    };

    let password = match register_matches.get_one::<String>("password") {
        Some(password) if !password.is_empty() => password.to_string(),
        _ => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    let role = register_matches
        .get_one::<String>("role")
        .map(|role| return role.as_str())
        .unwrap_or("patient");

    return Ok(Registration::new(&email, &full_name, &password)
        .with_role(role)
        .with_phone_number(&phone_number));
}

/// Creates a backend account, then points the user at the login flow.
async fn register(register_matches: &ArgMatches) -> Result<()> {
    let registration = prompt_registration(register_matches)?;
    if !registration.is_complete() {
        bail!("Email, full name and password are required");
    }

    let profile = ApiManager::get().register(&registration).await?;
    println!(
        "{}",
        Paint::green(format!(
            "Registered {} as {}. Run `medisense` to log in.",
            profile.email,
            if profile.role.is_empty() {
                registration.role.as_str()
            } else {
                profile.role.as_str()
            }
        ))
    );

    return Ok(());
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Log in, send a single query, and print the reply.")
        .arg(
            Arg::new("agent")
                .long("agent")
                .num_args(1)
                .help("Send the query straight to this agent instead of letting the backend route it."),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .env("MEDISENSE_PASSWORD")
                .hide_env_values(true)
                .num_args(1)
                .help("Password to log in with. Prompted for when not set."),
        )
        .arg(
            Arg::new("query")
                .help("Question or request for the assistant.")
                .action(ArgAction::Append)
                .num_args(1..)
                .required(true),
        );
}

fn subcommand_register() -> Command {
    return Command::new("register")
        .about("Create a MediSense-AI account.")
        .arg(
            Arg::new("full-name")
                .long("full-name")
                .num_args(1)
                .help("Full name for the account. Prompted for when not set."),
        )
        .arg(
            Arg::new("phone-number")
                .long("phone-number")
                .num_args(1)
                .help("Optional contact phone number. Prompted for when not set."),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .num_args(1)
                .value_parser(["patient", "clinician", "staff", "admin"])
                .default_value("patient")
                .help("Account role."),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .env("MEDISENSE_PASSWORD")
                .hide_env_values(true)
                .num_args(1)
                .help("Password for the new account. Prompted for when not set."),
        );
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for MediSense")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running MediSense with environment variable RUST_LOG=medisense")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("medisense")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start the interactive assistant."))
        .subcommand(subcommand_ask())
        .subcommand(subcommand_register())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .short('a')
                .long(ConfigKey::ApiURL.to_string())
                .env("MEDISENSE_API_URL")
                .num_args(1)
                .help(format!("MediSense-AI backend API URL. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("MEDISENSE_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::Email.to_string())
                .short('e')
                .long(ConfigKey::Email.to_string())
                .env("MEDISENSE_EMAIL")
                .num_args(1)
                .help("Email to prefill in the login form.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::HealthCheckTimeout.to_string())
                .long(ConfigKey::HealthCheckTimeout.to_string())
                .env("MEDISENSE_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before timing out when checking the backend is reachable. [default: {}]", Config::default(ConfigKey::HealthCheckTimeout)))
                .global(true),
        );
}

async fn handle_config(config_matches: &ArgMatches) -> Result<()> {
    match config_matches.subcommand() {
        Some(("create", _)) => create_config_file().await?,
        Some(("default", _)) => println!("{}", Config::serialize_default(build())),
        Some(("path", _)) => println!("{}", Config::default(ConfigKey::ConfigFile)),
        _ => subcommand_config().print_long_help()?,
    }

    return Ok(());
}

fn handle_debug(debug_matches: &ArgMatches) -> Result<()> {
    match debug_matches.subcommand() {
        Some(("log-path", _)) => {
            println!("{}", Config::log_dir().join("debug.log").to_string_lossy());
        }
        Some(("enum-config", _)) => println!("{}", ConfigKey::VARIANTS.join("\n")),
        _ => subcommand_debug().print_long_help()?,
    }

    return Ok(());
}

/// Runs one-shot subcommands. Returns true when the interactive UI should
/// start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("ask", ask_matches)) => {
            Config::load(vec![&matches, ask_matches]).await?;
            ask(ask_matches).await?;
        }
        Some(("register", register_matches)) => {
            Config::load(vec![&matches, register_matches]).await?;
            register(register_matches).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                print_completions(completions, &mut build());
            }
        }
        Some(("config", config_matches)) => handle_config(config_matches).await?,
        Some(("debug", debug_matches)) => handle_debug(debug_matches)?,
        Some(("manpages", _)) => clap_mangen::Man::new(build()).render(&mut io::stdout())?,
        Some((_, chat_matches)) => {
            Config::load(vec![&matches, chat_matches]).await?;
            return Ok(true);
        }
        None => {
            Config::load(vec![&matches]).await?;
            return Ok(true);
        }
    }

    return Ok(false);
}
