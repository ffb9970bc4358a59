#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use cms_admin::config::{ClientConfig, ConfigError, resolve_api_url};
use cms_admin::net::api::AdminApi;
use cms_admin::net::error::ApiError;
use cms_admin::net::http::ReqwestSender;
use cms_admin::net::types::RegisterRequest;
use cms_admin::router::guard::{Navigation, Router};
use cms_admin::router::navigator::History;
use cms_admin::router::routes::{DEFAULT_PATH, RouteTable};
use cms_admin::state::auth::{SessionError, SessionManager};
use cms_admin::state::i18n::{Locale, LocaleStore};
use cms_admin::state::storage::{FileStorage, KeyValueStorage};
use cms_admin::state::store::PersistedSessionStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid query parameter '{0}': expected key=value")]
    InvalidParam(String),
    #[error("no route for {0}")]
    NotFound(String),
    #[error("redirect loop while opening {0}")]
    RedirectLoop(String),
}

#[derive(Parser, Debug)]
#[command(name = "cms-admin", about = "CMS admin panel client")]
struct Cli {
    /// Backend origin; `/api` is appended.
    #[arg(long, env = "CMS_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "CMS_STATE_FILE")]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "CMS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Re-read the current user from the backend.
    Whoami,
    Logout,
    /// Show the stored session without contacting the backend.
    Status,
    /// Run the route guard for a view path and print where it lands.
    Open { path: String },
    Locale(LocaleCommand),
    Api(ApiCommand),
}

#[derive(Args, Debug)]
struct LocaleCommand {
    #[command(subcommand)]
    command: LocaleSubcommand,
}

#[derive(Subcommand, Debug)]
enum LocaleSubcommand {
    Show,
    Set { locale: Locale },
    Toggle,
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    ContentTypes {
        #[command(subcommand)]
        action: CrudAction,
    },
    Entries {
        uid: String,
        #[command(subcommand)]
        action: CrudAction,
    },
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    Roles {
        #[command(subcommand)]
        action: RoleAction,
    },
    Permissions {
        #[command(subcommand)]
        action: CrudAction,
    },
}

#[derive(Subcommand, Debug)]
enum CrudAction {
    List {
        /// Query parameter as `key=value`; repeatable.
        #[arg(long = "param")]
        params: Vec<String>,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserAction {
    List {
        #[arg(long = "param")]
        params: Vec<String>,
    },
    Get {
        id: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
    Password {
        id: String,
        #[arg(long, env = "CMS_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum RoleAction {
    #[command(flatten)]
    Crud(CrudAction),
    /// Roles offered at self-registration.
    Public,
}

struct CliContext {
    manager: SessionManager,
    locale: LocaleStore,
    history: Arc<History>,
}

impl CliError {
    /// Errors the command already explained in the user's language.
    fn already_reported(&self) -> bool {
        matches!(self, Self::Session(_) | Self::NotFound(_))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring .env: {e}");
        }
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.already_reported() {
                eprintln!("error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(origin) = cli.api_url.as_deref() {
        config.api_url = resolve_api_url(Some(origin))?;
    }
    if let Some(path) = cli.state_file {
        config.state_file = path;
    }

    let file = FileStorage::open(&config.state_file);
    tracing::debug!(api_url = %config.api_url, state_file = %file.path().display(), "client ready");
    let storage: Arc<dyn KeyValueStorage> = Arc::new(file);
    let history = Arc::new(History::new(DEFAULT_PATH));
    let sender = Arc::new(ReqwestSender::new(&config.api_url, config.timeouts)?);
    let ctx = CliContext {
        manager: SessionManager::connect(sender, PersistedSessionStore::new(storage.clone()), history.clone()),
        locale: LocaleStore::load(storage),
        history,
    };

    match cli.command {
        Command::Login { email, password } => run_login(&ctx, &email, &password).await,
        Command::Register { email, username, password, first_name, last_name } => {
            let payload = RegisterRequest { email, username, password, first_name, last_name };
            run_register(&ctx, &payload).await
        }
        Command::Whoami => run_whoami(&ctx).await,
        Command::Logout => {
            ctx.manager.logout();
            println!("{}", ctx.locale.t("auth.logout"));
            Ok(())
        }
        Command::Status => {
            run_status(&ctx);
            Ok(())
        }
        Command::Open { path } => run_open(&ctx, &path),
        Command::Locale(locale) => {
            run_locale(&ctx, locale.command);
            Ok(())
        }
        Command::Api(api) => {
            let result = run_api(ctx.manager.api(), api.command).await;
            if matches!(&result, Err(CliError::Api(e)) if e.is_unauthorized()) {
                eprintln!("{} ({})", ctx.locale.t("errors.sessionEnded"), ctx.history.current());
            }
            print_json(&result?)
        }
    }
}

async fn run_login(ctx: &CliContext, email: &str, password: &str) -> Result<(), CliError> {
    match ctx.manager.login(email, password).await {
        Ok(principal) => {
            println!("{} {}", ctx.locale.t("auth.loggedInAs"), principal.display_name());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", ctx.locale.t("errors.loginFailed"), e.message());
            Err(e.into())
        }
    }
}

async fn run_register(ctx: &CliContext, payload: &RegisterRequest) -> Result<(), CliError> {
    match ctx.manager.register(payload).await {
        Ok(principal) => {
            println!("{} {}", ctx.locale.t("auth.loggedInAs"), principal.display_name());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", ctx.locale.t("errors.registrationFailed"), e.message());
            Err(e.into())
        }
    }
}

async fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    match ctx.manager.fetch_current_principal().await {
        Ok(principal) => print_json(&serde_json::to_value(&principal)?),
        Err(e) => {
            eprintln!("{}: {}", ctx.locale.t("errors.sessionEnded"), e.message());
            Err(e.into())
        }
    }
}

fn run_status(ctx: &CliContext) {
    let session = ctx.manager.session();
    match session.principal() {
        _ if !session.is_authenticated() => println!("{}", ctx.locale.t("auth.notLoggedIn")),
        Some(principal) if principal.is_super_admin => println!(
            "{} {} ({})",
            ctx.locale.t("auth.loggedInAs"),
            principal.display_name(),
            ctx.locale.t("auth.superAdmin")
        ),
        Some(principal) => println!("{} {}", ctx.locale.t("auth.loggedInAs"), principal.display_name()),
        None => println!("{} ?", ctx.locale.t("auth.loggedInAs")),
    }
}

fn run_open(ctx: &CliContext, path: &str) -> Result<(), CliError> {
    let router = Router::new(RouteTable::admin_panel(), ctx.manager.context().clone(), ctx.history.clone());
    match router.navigate(path) {
        Navigation::Allowed(route) => {
            println!("{} ({})", route.path, route.name);
            Ok(())
        }
        Navigation::Redirected { to, .. } => {
            println!("{} {} ({})", ctx.locale.t("nav.redirected"), to.path, to.name);
            Ok(())
        }
        Navigation::NotFound(path) => {
            eprintln!("{}", ctx.locale.t("nav.notFound"));
            Err(CliError::NotFound(path))
        }
        Navigation::RedirectLoop(path) => Err(CliError::RedirectLoop(path)),
    }
}

fn run_locale(ctx: &CliContext, command: LocaleSubcommand) {
    let locale = match command {
        LocaleSubcommand::Show => ctx.locale.current(),
        LocaleSubcommand::Set { locale } => {
            ctx.locale.set_locale(locale);
            locale
        }
        LocaleSubcommand::Toggle => ctx.locale.toggle(),
    };
    println!("{}: {locale}", ctx.locale.t("locale.current"));
}

async fn run_api(api: &AdminApi, command: ApiSubcommand) -> Result<Value, CliError> {
    let value = match command {
        ApiSubcommand::ContentTypes { action } => {
            let content = api.content();
            match action {
                CrudAction::List { params } => content.list_types(&parse_params(&params)?).await?,
                CrudAction::Get { id } => content.get_type(&id).await?,
                CrudAction::Create { data } => content.create_type(&parse_data(&data)?).await?,
                CrudAction::Update { id, data } => content.update_type(&id, &parse_data(&data)?).await?,
                CrudAction::Delete { id } => content.delete_type(&id).await?,
            }
        }
        ApiSubcommand::Entries { uid, action } => {
            let content = api.content();
            match action {
                CrudAction::List { params } => content.list_entries(&uid, &parse_params(&params)?).await?,
                CrudAction::Get { id } => content.get_entry(&uid, &id).await?,
                CrudAction::Create { data } => content.create_entry(&uid, &parse_data(&data)?).await?,
                CrudAction::Update { id, data } => content.update_entry(&uid, &id, &parse_data(&data)?).await?,
                CrudAction::Delete { id } => content.delete_entry(&uid, &id).await?,
            }
        }
        ApiSubcommand::Users { action } => {
            let users = api.users();
            match action {
                UserAction::List { params } => users.list(&parse_params(&params)?).await?,
                UserAction::Get { id } => users.get(&id).await?,
                UserAction::Update { id, data } => users.update(&id, &parse_data(&data)?).await?,
                UserAction::Delete { id } => users.delete(&id).await?,
                UserAction::Password { id, password } => users.change_password(&id, &password).await?,
            }
        }
        ApiSubcommand::Roles { action } => {
            let roles = api.roles();
            match action {
                RoleAction::Public => roles.list_public().await?,
                RoleAction::Crud(CrudAction::List { params }) => roles.list(&parse_params(&params)?).await?,
                RoleAction::Crud(CrudAction::Get { id }) => roles.get(&id).await?,
                RoleAction::Crud(CrudAction::Create { data }) => roles.create(&parse_data(&data)?).await?,
                RoleAction::Crud(CrudAction::Update { id, data }) => roles.update(&id, &parse_data(&data)?).await?,
                RoleAction::Crud(CrudAction::Delete { id }) => roles.delete(&id).await?,
            }
        }
        ApiSubcommand::Permissions { action } => {
            let permissions = api.permissions();
            match action {
                CrudAction::List { params } => permissions.list(&parse_params(&params)?).await?,
                CrudAction::Get { id } => permissions.get(&id).await?,
                CrudAction::Create { data } => permissions.create(&parse_data(&data)?).await?,
                CrudAction::Update { id, data } => permissions.update(&id, &parse_data(&data)?).await?,
                CrudAction::Delete { id } => permissions.delete(&id).await?,
            }
        }
    };
    Ok(value)
}

fn parse_params(raw: &[String]) -> Result<Vec<(String, String)>, CliError> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .ok_or_else(|| CliError::InvalidParam(pair.clone()))
        })
        .collect()
}

fn parse_data(raw: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str(raw)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
