//! SammySwipe CLI
//!
//! Terminal front end over the page view models:
//! - Sign in, register, superuser mode
//! - Discover and swipe on candidates
//! - Matches, live chat, profile and preferences

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use sammyswipe::app::AppContext;
use sammyswipe::config::{generate_default_config, Config};
use sammyswipe::logging;
use sammyswipe::models::{Gender, Preferences};
use sammyswipe::pages::{
    ChatPage, DiscoverPage, LoginPage, MatchesPage, Page, ProfilePage, RegisterPage, VideoPage,
};

type Input = Lines<BufReader<Stdin>>;

#[derive(Parser)]
#[command(name = "sammyswipe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover people, match and chat on SammySwipe")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: <config_dir>/sammyswipe/config.toml, then ./config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overriding the config file
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        email: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        /// male, female, non_binary, other
        #[arg(long, default_value = "other")]
        gender: Gender,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: String,
        #[arg(long, default_value = "")]
        bio: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        interests: String,
        #[arg(long, default_value = "")]
        location: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Superuser mode (only when enabled in configuration)
    Superuser {
        #[command(subcommand)]
        action: SuperuserAction,
    },

    /// Browse recommendations interactively
    Discover,

    /// List matches
    Matches {
        /// Accept a pending like from this user id
        #[arg(long)]
        accept: Option<String>,
    },

    /// Chat with matches (interactive, live)
    Chat {
        /// Open this user's conversation instead of the first
        #[arg(long)]
        with: Option<String>,
    },

    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Update matching preferences
    Preferences {
        #[arg(long, default_value = "18")]
        min_age: u8,
        #[arg(long, default_value = "100")]
        max_age: u8,
        /// Repeat for several genders
        #[arg(long)]
        gender: Vec<Gender>,
        /// Kilometres
        #[arg(long)]
        max_distance: Option<u16>,
        #[arg(long, default_value = "0.5")]
        interests_weight: f64,
    },

    /// Upload a profile photo
    UploadPhoto { path: PathBuf },

    /// Video call placeholder
    Video {
        #[arg(long)]
        with: Option<String>,
    },

    /// Check the backend
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SuperuserAction {
    /// Sign in as the local superuser
    Login,
    /// Substitute rejected calls for the current session
    Enable,
    /// Stop substituting; ends a superuser sign-in
    Disable,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Change profile fields; omitted fields keep their value
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        photo: Option<String>,
        #[arg(long)]
        twitter: Option<String>,
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        facebook: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    logging::init(&config.logging);

    let ctx = AppContext::from_config(config)?;
    ctx.start().await;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let result = run(&ctx, cli.command, &mut input).await;

    print_toasts(&ctx);
    ctx.shutdown().await;

    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => Err(e),
    }
}

async fn run(ctx: &AppContext, command: Commands, input: &mut Input) -> anyhow::Result<bool> {
    match command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt(input, "Password: ").await?.unwrap_or_default(),
            };
            let mut page = LoginPage::with_credentials(email, password);
            page.mark_loading();
            eprintln!("{}", page.render());
            Ok(page.submit(ctx).await)
        }

        Commands::Register {
            email,
            username,
            name,
            password,
            gender,
            birth_date,
            bio,
            interests,
            location,
        } => {
            let mut page = RegisterPage {
                email,
                username,
                full_name: name,
                confirm_password: password.clone(),
                password,
                gender,
                birth_date,
                bio,
                interests,
                location,
            };
            Ok(page.submit(ctx).await)
        }

        Commands::Logout => {
            ctx.logout().await?;
            Ok(true)
        }

        Commands::Whoami => {
            let user = signed_in(ctx).await?;
            let state = ctx.session.snapshot().await;
            println!("{} <{}> ({})", user.full_name, user.email, user.id);
            if state.is_superuser {
                println!("Superuser mode: on");
            }
            Ok(true)
        }

        Commands::Superuser { action } => {
            let mut login = LoginPage::new();
            let ok = match action {
                SuperuserAction::Login => login.enter_superuser(ctx).await,
                SuperuserAction::Enable => {
                    ctx.session.enable_superuser().await?;
                    ctx.toasts.success("Superuser mode enabled");
                    true
                }
                SuperuserAction::Disable => {
                    ctx.session.disable_superuser().await?;
                    ctx.toasts.info("Superuser mode disabled");
                    true
                }
            };
            Ok(ok)
        }

        Commands::Discover => {
            signed_in(ctx).await?;
            discover(ctx, input).await
        }

        Commands::Matches { accept } => {
            signed_in(ctx).await?;
            let mut page = MatchesPage::new();
            if let Some(user_id) = accept {
                if !page.accept(ctx, &user_id).await {
                    return Ok(false);
                }
            }
            page.mark_loading();
            eprintln!("{}", page.render());
            page.load(ctx).await;
            println!("{}", page.render());
            Ok(true)
        }

        Commands::Chat { with } => chat(ctx, with, input).await,

        Commands::Profile { action } => {
            let mut page = ProfilePage::new();
            page.mount(ctx).await.context(SIGN_IN_HINT)?;
            let ok = match action {
                None => true,
                Some(ProfileAction::Update {
                    name,
                    bio,
                    photo,
                    twitter,
                    instagram,
                    facebook,
                }) => {
                    let form = &mut page.form;
                    for (field, value) in [
                        (&mut form.full_name, name),
                        (&mut form.bio, bio),
                        (&mut form.profile_photo, photo),
                        (&mut form.twitter, twitter),
                        (&mut form.instagram, instagram),
                        (&mut form.facebook, facebook),
                    ] {
                        if let Some(value) = value {
                            *field = value;
                        }
                    }
                    page.mark_saving();
                    eprintln!("{}", page.render());
                    page.submit(ctx).await
                }
            };
            println!("{}", page.render());
            Ok(ok)
        }

        Commands::Preferences {
            min_age,
            max_age,
            gender,
            max_distance,
            interests_weight,
        } => {
            let mut page = ProfilePage::new();
            page.mount(ctx).await.context(SIGN_IN_HINT)?;
            let preferences = Preferences {
                min_age,
                max_age,
                preferred_gender: (!gender.is_empty()).then_some(gender),
                max_distance,
                interests_weight,
            };
            Ok(page.update_preferences(ctx, &preferences).await)
        }

        Commands::UploadPhoto { path } => {
            let mut page = ProfilePage::new();
            page.mount(ctx).await.context(SIGN_IN_HINT)?;
            Ok(page.upload_photo(ctx, &path).await)
        }

        Commands::Video { with } => {
            signed_in(ctx).await?;
            let mut page = VideoPage::new();
            page.start_call(with);
            println!("{}", page.render());
            prompt(input, "Press Enter to end the call").await?;
            page.end_call();
            println!("Call ended");
            Ok(true)
        }

        Commands::Health => match ctx.api.health().await {
            Ok(body) => {
                println!("{}", serde_json::to_string_pretty(&body)?);
                Ok(true)
            }
            Err(e) => {
                eprintln!("Cannot reach SammySwipe API at {}", ctx.api.base_url());
                eprintln!("Error: {}", e);
                Ok(false)
            }
        },

        Commands::Config { .. } => Ok(true),
    }
}

const SIGN_IN_HINT: &str = "Sign in first with `sammyswipe login`";

async fn signed_in(ctx: &AppContext) -> anyhow::Result<sammyswipe::models::User> {
    ctx.require_user().await.context(SIGN_IN_HINT)
}

async fn discover(ctx: &AppContext, input: &mut Input) -> anyhow::Result<bool> {
    let mut page = DiscoverPage::new();
    page.mark_loading();
    eprintln!("{}", page.render());
    page.load(ctx).await;

    loop {
        print_toasts(ctx);
        println!("\n{}", page.render());

        let Some(id) = page.current().map(|c| c.id.clone()) else {
            match prompt(input, "[f]refresh [q]uit > ").await?.as_deref() {
                Some("f") => {
                    page.mark_loading();
                    eprintln!("{}", page.render());
                    page.refresh(ctx).await;
                    continue;
                }
                _ => return Ok(true),
            }
        };

        match prompt(input, "[l]ike [s]kip [r]eject [f]refresh [q]uit > ")
            .await?
            .as_deref()
        {
            Some("l") => {
                page.like(ctx, &id).await;
            }
            Some("s") => {
                page.skip(&id);
            }
            Some("r") => {
                page.reject(ctx, &id).await;
            }
            Some("f") => {
                page.mark_loading();
                eprintln!("{}", page.render());
                page.refresh(ctx).await;
            }
            Some("q") | None => return Ok(true),
            Some(_) => println!("Unknown choice"),
        }
    }
}

async fn chat(ctx: &AppContext, with: Option<String>, input: &mut Input) -> anyhow::Result<bool> {
    let mut page = ChatPage::new();
    page.mark_loading();
    eprintln!("{}", page.render());
    page.mount(ctx).await.context(SIGN_IN_HINT)?;
    if let Some(user_id) = with {
        page.select(ctx, &user_id).await;
    }

    print_toasts(ctx);
    println!("{}", page.render());
    println!("\nType a message and press Enter. /open <n> switches conversation, /quit leaves.");

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line == "/quit" {
                    break;
                }
                if let Some(index) = line.strip_prefix("/open ") {
                    let target = index
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|n| page.conversations().get(n))
                        .map(|c| c.id.clone());
                    match target {
                        Some(id) => {
                            page.select(ctx, &id).await;
                            println!("{}", page.render());
                        }
                        None => println!("No such conversation"),
                    }
                } else {
                    page.input = line.to_string();
                    if page.send(ctx).await {
                        if let Some(sent) = page.messages().last() {
                            println!("You: {}", sent.content);
                        }
                    }
                }
                print_toasts(ctx);
            }
            inbound = page.next_inbound() => {
                if let Some(message) = inbound {
                    println!("<< {}", message.content);
                }
            }
        }
    }

    page.unmount();
    Ok(true)
}

async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|l| l.trim().to_string()))
}

fn print_toasts(ctx: &AppContext) {
    for toast in ctx.toasts.drain() {
        eprintln!("{}", toast);
    }
}
