//! CLI entry point for the studynotes backend (for dev and testing).

use std::io::{self, BufRead, Write};

use clap::Parser;
use studynotes_core::backend::UserProfile;
use studynotes_core::{
    app_data_dir, config, load_config, set_backend_field, status, AuthService, AuthState, GamePin,
    SignInForm, SignUpForm,
};
use tracing_subscriber::EnvFilter;

mod shell;

#[derive(Parser)]
#[command(name = "studynotes")]
#[command(about = "studynotes: course notes and study assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show backend status (for dev).
    Status,
    /// Show where studynotes stores its config (app data directory).
    DataDir,
    /// Print the effective backend config and which backend it selects.
    Config,
    /// Set one backend config key (e.g. project_id) and save the config file.
    ConfigSet {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Create an account and its profile.
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Defaults to --password.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign in with email and password, then show the current user.
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the signed-in user, if any.
    Whoami,
    /// End the current session.
    SignOut,
    /// Send a password recovery email.
    ResetPassword {
        #[arg(value_name = "EMAIL")]
        email: String,
    },
    /// Send an email verification link to the signed-in account.
    VerifyEmail,
    /// List active sessions.
    Sessions,
    /// Join a quiz by game pin.
    Quiz {
        #[arg(value_name = "PIN")]
        pin: String,
    },
    /// Interactive notes session on an in-memory store (type `help`).
    Notes,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let backend_config = load_config().backend.with_env_overrides();

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => {
            println!("studynotes backend");
            println!("  core: {}", status());
            println!("  backend: {}", AuthService::from_config(&backend_config).kind());
        }
        Commands::DataDir => match app_data_dir() {
            Some(p) => println!("{}", p.display()),
            None => eprintln!("Could not determine app data directory."),
        },
        Commands::Config => {
            match config::config_path() {
                Some(p) => println!("# {}", p.display()),
                None => println!("# (no config file location)"),
            }
            let shown = config::Config {
                backend: backend_config.clone(),
            };
            match toml::to_string_pretty(&shown) {
                Ok(s) => print!("{}", s),
                Err(e) => eprintln!("Error: {}", e),
            }
            println!("# selected backend: {}", AuthService::from_config(&backend_config).kind());
        }
        Commands::ConfigSet { key, value } => match set_backend_field(&key, &value) {
            Ok(()) => println!("Set {} = {}", key, value.trim()),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::SignUp {
            email,
            username,
            password,
            confirm_password,
        } => {
            let form = SignUpForm {
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                username,
                email,
                password,
            };
            if let Err(e) = form.validate() {
                eprintln!("Error: {}", e);
                return;
            }
            let service = AuthService::from_config(&backend_config);
            match service.create_user(&form.email, &form.password, &form.username).await {
                Ok(user) => {
                    println!("Account created successfully");
                    print_json(&user);
                }
                Err(e) => eprintln!("Error: {}", e.user_message()),
            }
        }
        Commands::SignIn { email, password } => {
            let form = SignInForm { email, password };
            if let Err(e) = form.validate() {
                eprintln!("Error: {}", e);
                return;
            }
            let service = AuthService::from_config(&backend_config);
            match service.sign_in(&form.email, &form.password).await {
                Ok(session) => {
                    println!("Signed in (session {})", session.id);
                    let mut state = AuthState::default();
                    state.set_user(service.get_current_user().await);
                    print_user(state.user());
                }
                Err(e) => eprintln!("Error: {}", e.user_message()),
            }
        }
        Commands::Whoami => {
            let service = AuthService::from_config(&backend_config);
            let state = AuthState::restore(&service).await;
            print_user(state.user());
        }
        Commands::SignOut => {
            let service = AuthService::from_config(&backend_config);
            let mut state = AuthState::restore(&service).await;
            match service.sign_out().await {
                Ok(()) => {
                    if let Some(u) = state.user() {
                        println!("Signed out {}", u.display_name());
                    } else {
                        println!("Signed out");
                    }
                    state.clear();
                    print_user(state.user());
                }
                Err(e) => eprintln!("Error: {}", e.user_message()),
            }
        }
        Commands::ResetPassword { email } => {
            let service = AuthService::from_config(&backend_config);
            match service.reset_password(&email).await {
                Ok(token) => println!(
                    "Recovery email sent (expires {})",
                    token.expire.as_deref().unwrap_or("unknown")
                ),
                Err(e) => eprintln!("Error: {}", e.user_message()),
            }
        }
        Commands::VerifyEmail => {
            let service = AuthService::from_config(&backend_config);
            match service.send_verification_email().await {
                Ok(token) => println!("Verification email sent ({})", token.id),
                Err(e) => eprintln!("Error: {}", e.user_message()),
            }
        }
        Commands::Sessions => {
            let service = AuthService::from_config(&backend_config);
            match service.list_sessions().await {
                Ok(list) => {
                    println!("{} session(s)", list.total);
                    for s in list.sessions {
                        println!("  {}  user {}  expires {}", s.id, s.user_id, s.expire);
                    }
                }
                Err(e) => eprintln!("Error: {}", e.user_message()),
            }
        }
        Commands::Quiz { pin } => match GamePin::parse(&pin) {
            Ok(pin) => {
                tracing::info!(pin = pin.as_str(), "joining quiz");
                println!("Entering quiz with PIN {}", pin.as_str());
            }
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::Notes => {
            if let Err(e) = run_notes_shell() {
                eprintln!("Error: {}", e);
            }
        }
    }
}

fn run_notes_shell() -> io::Result<()> {
    let mut session = shell::Session::default();
    let stdin = io::stdin();
    let mut out = io::stdout();
    writeln!(out, "In-memory notes. Type `help` for commands; notes are lost on exit.")?;
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match shell::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(shell::Command::Quit)) => break,
            Ok(Some(cmd)) => {
                for l in shell::execute(&mut session, cmd) {
                    writeln!(out, "{}", l)?;
                }
            }
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
    }
    Ok(())
}

fn print_user(user: Option<&UserProfile>) {
    match user {
        Some(u) => {
            println!("Signed in as {} <{}>", u.display_name(), u.email);
            print_json(u);
        }
        None => println!("Not signed in"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}
