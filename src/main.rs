use std::time::Duration;

use candid::{Nat, Principal};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::Level;

use petfinder::net::interface;
use petfinder::net::types::{BackendError, Category, PostDraft, PostStatus, UserUpdate};
use petfinder::render::{ConversationView, PostView, UserView, WatchEvent, WatchFeed};
use petfinder::state::auth::AuthState;
use petfinder::state::conversations::ConversationsState;
use petfinder::state::listing::{ListingFilter, SortKey};
use petfinder::state::poll::spawn_conversation_poll;
use petfinder::state::posts::PostsState;
use petfinder::state::wallet::{WalletState, parse_amount};
use petfinder::state::{ConnectionStatus, Session};
use petfinder::{ClientConfig, ClientError};

#[derive(Parser, Debug)]
#[command(name = "petfinder", about = "Lost-and-found pet canister client")]
struct Cli {
    #[arg(long, env = "PETFINDER_HOST", global = true)]
    host: Option<String>,

    #[arg(long, env = "PETFINDER_CANISTER_ID", global = true)]
    canister_id: Option<String>,

    #[arg(long, env = "PETFINDER_NETWORK", global = true, help = "local or ic")]
    network: Option<String>,

    #[arg(long, env = "PETFINDER_IDENTITY_PEM", global = true, help = "PEM key to sign calls with")]
    identity: Option<String>,

    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connection test with a remedy hint on failure.
    Ping,
    /// Print the Candid service description.
    Interface,
    User(UserCommand),
    Post(PostCommand),
    Convo(ConvoCommand),
    Wallet(WalletCommand),
}

#[derive(Args, Debug)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
enum UserSubcommand {
    Show,
    Create {
        username: String,
        email: String,
        password: String,
    },
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Args, Debug)]
struct PostCommand {
    #[command(subcommand)]
    command: PostSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostSubcommand {
    List(PostListArgs),
    Show {
        id: u64,
    },
    Create(PostCreateArgs),
    Status {
        id: u64,
        status: PostStatus,
    },
}

#[derive(Args, Debug)]
struct PostListArgs {
    #[arg(long)]
    category: Option<Category>,

    #[arg(long)]
    area: Option<String>,

    #[arg(long)]
    search: Option<String>,

    #[arg(long = "type")]
    pet_type: Option<String>,

    #[arg(long, default_value = "date")]
    sort: SortKey,

    #[arg(long, default_value_t = false, help = "Only posts owned by the caller")]
    mine: bool,
}

#[derive(Args, Debug)]
struct PostCreateArgs {
    #[arg(long)]
    name: String,

    #[arg(long = "type")]
    pet_type: String,

    #[arg(long, default_value = "")]
    breed: String,

    #[arg(long, default_value = "")]
    color: String,

    #[arg(long, default_value = "")]
    height: String,

    #[arg(long)]
    location: String,

    #[arg(long)]
    category: Category,

    #[arg(long)]
    area: String,

    #[arg(long = "photo")]
    photos: Vec<String>,

    #[arg(long, default_value_t = 0)]
    award: u64,
}

#[derive(Args, Debug)]
struct ConvoCommand {
    #[command(subcommand)]
    command: ConvoSubcommand,
}

#[derive(Subcommand, Debug)]
enum ConvoSubcommand {
    List,
    Show {
        id: u64,
    },
    Start {
        principal: String,
    },
    Send {
        id: u64,
        body: String,
    },
    Proof {
        id: u64,
        url: String,
    },
    Reward {
        id: u64,
        post_id: u64,
        recipient: String,
    },
    /// Follow a conversation until interrupted.
    Watch {
        id: u64,
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct WalletCommand {
    #[command(subcommand)]
    command: WalletSubcommand,
}

#[derive(Subcommand, Debug)]
enum WalletSubcommand {
    Balance,
    Deposit { amount: String },
    Withdraw { amount: String },
}

struct CliContext {
    config: ClientConfig,
    session: Session,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    if matches!(cli.command, Command::Interface) {
        print!("{}", interface::service_did());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let session = Session::connect(&config).await;
    if session.status == ConnectionStatus::Failed {
        if let Some(message) = &session.error {
            eprintln!("{message}");
        }
    }
    let mut ctx = CliContext { config, session, json: cli.json };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Interface => Ok(()),
        Command::User(user) => run_user(&mut ctx, user).await,
        Command::Post(post) => run_post(&ctx, post).await,
        Command::Convo(convo) => run_convo(&ctx, convo).await,
        Command::Wallet(wallet) => run_wallet(&mut ctx, wallet).await,
    }
}

/// Environment config with command-line flags taking precedence.
fn load_config(cli: &Cli) -> Result<ClientConfig, ClientError> {
    ClientConfig::from_lookup(|key| {
        let flag = match key {
            "PETFINDER_HOST" => cli.host.clone(),
            "PETFINDER_CANISTER_ID" => cli.canister_id.clone(),
            "PETFINDER_NETWORK" => cli.network.clone(),
            "PETFINDER_IDENTITY_PEM" => cli.identity.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })
}

async fn run_ping(ctx: &CliContext) -> Result<(), ClientError> {
    let report = ctx.session.probe().await;
    if report.ok {
        println!("ok: {} posts from canister {} at {}", report.post_count, ctx.config.canister_id, ctx.config.host);
        return Ok(());
    }
    let message = report.error.unwrap_or_default();
    eprintln!("connection test failed: {message}");
    if let Some(hint) = report.hint {
        eprintln!("hint: {hint}");
    }
    Err(ClientError::Agent(message))
}

async fn run_user(ctx: &mut CliContext, user: UserCommand) -> Result<(), ClientError> {
    let mut auth = AuthState::default();
    match user.command {
        UserSubcommand::Show => match &ctx.session.user {
            Some(user) => emit(ctx.json, &UserView::from(user), UserView::detail),
            None => Err(BackendError::NotFound.into()),
        },
        UserSubcommand::Create { username, email, password } => {
            let id = auth.create_user(&mut ctx.session, &username, &email, &password).await?;
            println!("registered {username} as {id}");
            Ok(())
        }
        UserSubcommand::Update { username, email, password } => {
            let update = UserUpdate::from_flags(username, email, password);
            if update.is_empty() {
                return Err(ClientError::InvalidArgument("nothing to update".into()));
            }
            auth.update_user(&mut ctx.session, &update).await?;
            match &ctx.session.user {
                Some(user) => emit(ctx.json, &UserView::from(user), UserView::detail),
                None => Ok(()),
            }
        }
    }
}

async fn run_post(ctx: &CliContext, post: PostCommand) -> Result<(), ClientError> {
    let mut posts = PostsState::default();
    match post.command {
        PostSubcommand::List(args) => run_post_list(ctx, &mut posts, args).await,
        PostSubcommand::Show { id } => match posts.get_post(&ctx.session, &Nat::from(id)).await? {
            Some(post) => emit(ctx.json, &PostView::from(&post), PostView::detail),
            None => Err(BackendError::NotFound.into()),
        },
        PostSubcommand::Create(args) => {
            let draft = PostDraft {
                pet_name: args.name,
                pet_type: args.pet_type,
                breed: args.breed,
                color: args.color,
                height: args.height,
                last_seen_location: args.location,
                category: args.category,
                area: args.area,
                photos: args.photos,
                award_amount: Nat::from(args.award),
            };
            let id = posts.create_post(&ctx.session, &draft).await?;
            println!("created post #{}", id.0);
            Ok(())
        }
        PostSubcommand::Status { id, status } => {
            posts.update_post_status(&ctx.session, &Nat::from(id), status).await?;
            println!("post #{id} is now {status}");
            Ok(())
        }
    }
}

async fn run_post_list(ctx: &CliContext, posts: &mut PostsState, args: PostListArgs) -> Result<(), ClientError> {
    // Only one remote selector applies; the rest are filtered locally.
    let mut local_search = String::new();
    if args.mine {
        posts.get_user_posts(&ctx.session).await?;
        local_search = args.search.unwrap_or_default();
    } else if let Some(area) = &args.area {
        posts.get_posts_by_area(&ctx.session, area).await?;
        local_search = args.search.unwrap_or_default();
    } else if let Some(query) = &args.search {
        posts.search_posts(&ctx.session, query).await?;
    } else if let Some(category) = args.category {
        posts.get_posts_by_category(&ctx.session, category).await?;
    } else {
        posts.get_all_posts(&ctx.session).await?;
    }

    let filter = ListingFilter { search: local_search, category: args.category, pet_type: args.pet_type, sort: args.sort };
    let views: Vec<PostView> = filter.apply(&posts.posts).iter().map(PostView::from).collect();
    emit(ctx.json, &views, |views| {
        if views.is_empty() {
            return "no posts".to_owned();
        }
        views.iter().map(PostView::summary).collect::<Vec<_>>().join("\n")
    })
}

async fn run_convo(ctx: &CliContext, convo: ConvoCommand) -> Result<(), ClientError> {
    let mut convos = ConversationsState::default();
    match convo.command {
        ConvoSubcommand::List => {
            convos.get_user_conversations(&ctx.session).await?;
            let views: Vec<ConversationView> = convos.conversations.iter().map(ConversationView::from).collect();
            emit(ctx.json, &views, |views| {
                if views.is_empty() {
                    return "no conversations".to_owned();
                }
                views.iter().map(ConversationView::summary).collect::<Vec<_>>().join("\n")
            })
        }
        ConvoSubcommand::Show { id } => show_conversation(ctx, &mut convos, &Nat::from(id)).await,
        ConvoSubcommand::Start { principal } => {
            let other = parse_principal(&principal)?;
            let id = convos.create_conversation(&ctx.session, other).await?;
            println!("started conversation #{}", id.0);
            Ok(())
        }
        ConvoSubcommand::Send { id, body } => {
            let id = Nat::from(id);
            convos.get_conversation(&ctx.session, &id).await?;
            convos.send_message(&ctx.session, &id, &body).await?;
            print_current(ctx, &convos)
        }
        ConvoSubcommand::Proof { id, url } => {
            let id = Nat::from(id);
            convos.get_conversation(&ctx.session, &id).await?;
            convos.add_proof(&ctx.session, &id, &url).await?;
            print_current(ctx, &convos)
        }
        ConvoSubcommand::Reward { id, post_id, recipient } => {
            let id = Nat::from(id);
            let recipient = parse_principal(&recipient)?;
            convos.get_conversation(&ctx.session, &id).await?;
            convos.process_reward(&ctx.session, &id, &Nat::from(post_id), recipient).await?;
            print_current(ctx, &convos)
        }
        ConvoSubcommand::Watch { id, interval_ms } => {
            let interval = interval_ms.map_or(ctx.config.poll_interval, Duration::from_millis);
            run_watch(ctx, Nat::from(id), interval).await
        }
    }
}

async fn show_conversation(
    ctx: &CliContext,
    convos: &mut ConversationsState,
    id: &Nat,
) -> Result<(), ClientError> {
    match convos.get_conversation(&ctx.session, id).await? {
        Some(conversation) => emit(ctx.json, &ConversationView::from(&conversation), ConversationView::detail),
        None => Err(BackendError::NotFound.into()),
    }
}

fn print_current(ctx: &CliContext, convos: &ConversationsState) -> Result<(), ClientError> {
    if let Some(error) = &convos.error {
        eprintln!("change saved, but reloading the conversation failed: {error}");
    }
    match &convos.current {
        Some(conversation) => emit(ctx.json, &ConversationView::from(conversation), ConversationView::detail),
        None => Ok(()),
    }
}

async fn run_watch(ctx: &CliContext, id: Nat, interval: Duration) -> Result<(), ClientError> {
    let backend = ctx.session.backend()?;
    let poller = spawn_conversation_poll(backend, id, interval);
    let mut updates = poller.updates();
    let mut feed = WatchFeed::default();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let event = feed.observe((*updates.borrow_and_update()).as_ref());
                match event {
                    Some(WatchEvent::Updated(view)) => emit(ctx.json, &view, ConversationView::detail)?,
                    Some(WatchEvent::Unavailable) => eprintln!("conversation is not available"),
                    None => {}
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop();
    Ok(())
}

async fn run_wallet(ctx: &mut CliContext, wallet: WalletCommand) -> Result<(), ClientError> {
    let mut state = WalletState::default();
    let balance = match wallet.command {
        WalletSubcommand::Balance => {
            ctx.session.refresh_user().await;
            if !ctx.session.is_authenticated() {
                return Err(BackendError::NotFound.into());
            }
            WalletState::balance(&ctx.session)
        }
        WalletSubcommand::Deposit { amount } => {
            let amount = parse_amount(&amount)?;
            state.deposit(&mut ctx.session, &amount).await?
        }
        WalletSubcommand::Withdraw { amount } => {
            let amount = parse_amount(&amount)?;
            state.withdraw(&mut ctx.session, &amount).await?
        }
    };
    let rendered = balance.0.to_string();
    emit(ctx.json, &serde_json::json!({ "balance": rendered }), |_| format!("balance: {rendered}"))
}

fn parse_principal(raw: &str) -> Result<Principal, ClientError> {
    Principal::from_text(raw.trim()).map_err(|_| ClientError::InvalidPrincipal(raw.to_owned()))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<(), ClientError> {
    if json {
        let rendered = serde_json::to_string_pretty(value)?;
        println!("{rendered}");
    } else {
        println!("{}", text(value));
    }
    Ok(())
}
