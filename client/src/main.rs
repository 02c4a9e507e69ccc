//! Roster - console view of a remote user directory.
//!
//! Loads a page through the sync controller, applies the configured search
//! and prints the result together with any notifications.

use roster_client::{Config, HttpUserStore, StaticToken, SyncController};
use roster_engine::{Notification, NotificationKind, StateSnapshot};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=info,roster_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Using user directory at {}", config.api_url);

    let remote = HttpUserStore::from_config(&config, StaticToken::from(config.token.clone()))?;
    let controller = SyncController::new(remote);
    let mut notifications = controller.notifications();

    controller.refresh().await;
    if config.start_page != 1 {
        controller.set_page(config.start_page).await;
    }
    if let Some(search) = &config.search {
        controller.set_search_query(search.as_str());
    }

    print_notifications(&mut notifications);
    render(&controller.snapshot());

    Ok(())
}

fn print_notifications(rx: &mut broadcast::Receiver<Notification>) {
    while let Ok(note) = rx.try_recv() {
        match note.kind {
            NotificationKind::Success => tracing::info!("{}", note.message),
            NotificationKind::Error => tracing::error!("{}", note.message),
        }
    }
}

fn render(state: &StateSnapshot) {
    if let Some(error) = &state.page.last_error {
        println!("! {}", error.message);
    }

    if state.filtered.is_empty() {
        println!("No users found");
    } else {
        println!("{:>4}  {:<16} {:<16} EMAIL", "ID", "FIRST NAME", "LAST NAME");
        for user in &state.filtered {
            println!(
                "{:>4}  {:<16} {:<16} {}",
                user.id, user.first_name, user.last_name, user.email
            );
        }
    }

    println!(
        "Page {} of {}{}",
        state.page.current_page,
        state.page.total_pages,
        if state.query.is_empty() {
            String::new()
        } else {
            format!(" (search: \"{}\")", state.query.text)
        }
    );
}
