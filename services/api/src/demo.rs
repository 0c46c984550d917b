use crate::infra::{
    demo_catalog, parse_status, DemoAuthDirectory, InMemoryListingRepository, InMemoryNotifier,
};
use chrono::Utc;
use clap::Args;
use propertyhub::auth::{
    classify, AuthSessionFactory, ConfirmationFailure, Credentials, ErrorPopup, LoginFlow,
    LoginOutcome, ToastLog,
};
use propertyhub::config::AppConfig;
use propertyhub::error::AppError;
use propertyhub::listings::{FilterKey, FilterPanel, Filters};
use propertyhub::moderation::{
    ListingId, ListingQuery, ListingRepository, ModerationAction, ModerationService, Notifier,
    PropertyStatus, QuickActions,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub(crate) struct ActionsArgs {
    /// Listing status to inspect (pending, approved, rejected, published, unpublished).
    /// Shows every status when omitted.
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<PropertyStatus>,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Raw error text as returned by the auth provider
    pub(crate) message: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Auto-close delay for the login error popup, in milliseconds.
    /// Defaults to APP_ERROR_POPUP_MS.
    #[arg(long)]
    pub(crate) popup_ms: Option<u64>,
    /// Skip the login portion of the demo.
    #[arg(long)]
    pub(crate) skip_login: bool,
}

pub(crate) fn run_actions(args: ActionsArgs) -> Result<(), AppError> {
    let statuses = match args.status {
        Some(status) => vec![status],
        None => PropertyStatus::ordered().to_vec(),
    };

    println!("Quick actions by status");
    for status in statuses {
        let panel = QuickActions::for_status(ListingId(status.key().to_string()), status);
        let labels = panel.labels();
        println!(
            "  {:<22} [{} / {}] {}",
            panel.badge.label,
            status.key(),
            panel.badge.icon,
            if labels.is_empty() {
                "(tidak ada aksi)".to_string()
            } else {
                labels.join(", ")
            }
        );
    }
    Ok(())
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let classification = classify(&args.message);
    println!("Kind:    {}", classification.kind.code());
    println!("Title:   {}", classification.notice.title);
    println!("Message: {}", classification.notice.message);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let popup_delay = args
        .popup_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.ui.error_popup_delay());

    println!("PropertyHub moderation demo");

    let repository = Arc::new(InMemoryListingRepository::seeded(Utc::now()));
    let notifier = Arc::new(InMemoryNotifier::default());
    let service = ModerationService::new(repository, notifier.clone(), demo_catalog())
        .with_page_size(config.ui.page_size);

    render_stats(&service);

    let panel = FilterPanel::new(service.catalog().clone());
    let mut filters = Filters::default();
    if let Err(err) = panel.change(&mut filters, FilterKey::Status, "pending") {
        println!("  Filter rejected: {}", err);
    }
    println!("\nPending queue ({} active filter)", filters.active_count());
    match service.list(ListingQuery {
        filters: filters.clone(),
        page: 1,
        page_size: None,
    }) {
        Ok(page) => {
            for card in &page.items {
                println!(
                    "  {:<10} {:<32} {:<12} aksi: {}",
                    card.listing.id,
                    card.listing.title,
                    card.badge.label,
                    card.actions
                        .iter()
                        .map(|button| button.label)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            println!(
                "  page {}/{} ({} listings)",
                page.pagination.page, page.pagination.total_pages, page.pagination.total
            );
        }
        Err(err) => println!("  Listing unavailable: {}", err),
    }
    panel.reset(&mut filters);

    let listing_id = ListingId("prop-001".to_string());
    println!("\nModeration walk-through for {}", listing_id);
    for action in [
        ModerationAction::Approve,
        ModerationAction::Publish,
        ModerationAction::Unpublish,
        ModerationAction::Publish,
        ModerationAction::Reject,
    ] {
        match service.apply(&listing_id, action) {
            Ok(listing) => println!(
                "  {:<14} -> {}",
                action.label(),
                listing.status.badge().label
            ),
            Err(err) => println!("  {:<14} refused: {}", action.label(), err),
        }
    }

    let events = notifier.events();
    if events.is_empty() {
        println!("  Agent notifications: none dispatched");
    } else {
        println!("  Agent notifications:");
        for event in events {
            println!("    [{}] {}: {}", event.user_id, event.title, event.message);
        }
    }

    render_stats(&service);

    if !args.skip_login {
        render_login_demo(popup_delay).await;
    }

    println!("\nEmail confirmation failure copy");
    for failure in ConfirmationFailure::recognized() {
        println!("  {:<18} {}", failure.code(), failure.message());
    }

    Ok(())
}

fn render_stats<R, N>(service: &ModerationService<R, N>)
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    match service.stats() {
        Ok(stats) => {
            println!("\nDashboard");
            for card in stats.cards() {
                println!("  {:<22} {:>3}", card.label, card.value);
            }
        }
        Err(err) => println!("\nDashboard unavailable: {}", err),
    }
}

async fn render_login_demo(popup_delay: Duration) {
    let directory = DemoAuthDirectory::seeded();
    println!("\nAdmin login attempts");

    for (email, password) in [
        ("admin@propertyhub.id", "admin-demo"),
        ("admin@propertyhub.id", "salah"),
        ("budi@propertyhub.id", "agen-demo"),
        ("baru@propertyhub.id", "baru-demo"),
    ] {
        let popup = ErrorPopup::new(popup_delay);
        let flow = LoginFlow::new(directory.session(), ToastLog::default())
            .with_popup(popup.clone());
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        match flow.admin_login(&credentials).await {
            LoginOutcome::SignedIn { .. } => println!("  {:<22} signed in", email),
            LoginOutcome::Failed(classification) => println!(
                "  {:<22} {} (popup: {})",
                email,
                classification.notice,
                if popup.is_open() { "open" } else { "closed" }
            ),
        }
    }
}
