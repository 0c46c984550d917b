use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use propertyhub::auth::{AuthFailure, AuthProvider, AuthSessionFactory, Credentials};
use propertyhub::listings::{FilterCatalog, Notification};
use propertyhub::moderation::{
    Listing, ListingId, ListingPatch, ListingPurpose, ListingRepository, Notifier, NotifyError,
    PropertyStatus, PropertyType, RepositoryError,
};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryListingRepository {
    listings: Arc<Mutex<BTreeMap<ListingId, Listing>>>,
}

impl InMemoryListingRepository {
    pub(crate) fn seeded(now: DateTime<Utc>) -> Self {
        let repository = Self::default();
        {
            let mut guard = lock(&repository.listings);
            for listing in seed_listings(now) {
                guard.insert(listing.id.clone(), listing);
            }
        }
        repository
    }
}

impl ListingRepository for InMemoryListingRepository {
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Ok(lock(&self.listings).get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Listing>, RepositoryError> {
        Ok(lock(&self.listings).values().cloned().collect())
    }

    fn update_status(
        &self,
        id: &ListingId,
        expected: PropertyStatus,
        next: PropertyStatus,
        at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError> {
        let mut guard = lock(&self.listings);
        let listing = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if listing.status != expected {
            return Err(RepositoryError::Conflict {
                expected,
                actual: listing.status,
            });
        }
        listing.status = next;
        listing.updated_at = at;
        Ok(listing.clone())
    }

    fn update_fields(
        &self,
        id: &ListingId,
        patch: ListingPatch,
        at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError> {
        let mut guard = lock(&self.listings);
        let listing = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        patch.apply(listing, at);
        Ok(listing.clone())
    }

    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        lock(&self.listings)
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifier {
    pub(crate) fn events(&self) -> Vec<Notification> {
        lock(&self.events).clone()
    }
}

impl Notifier for InMemoryNotifier {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(user = %notification.user_id, title = %notification.title, "notification queued");
        lock(&self.events).push(notification);
        Ok(())
    }
}

pub(crate) const DEMO_AGENTS: [(&str, &str); 3] = [
    ("agent-budi", "Budi Santoso"),
    ("agent-sari", "Sari Dewi"),
    ("agent-rina", "Rina Wijaya"),
];

pub(crate) fn demo_catalog() -> FilterCatalog {
    FilterCatalog::new(DEMO_AGENTS)
}

struct SeedListing {
    id: &'static str,
    title: &'static str,
    property_type: PropertyType,
    purpose: ListingPurpose,
    agent_id: &'static str,
    city: &'static str,
    price: u64,
    status: PropertyStatus,
    age: Duration,
}

impl SeedListing {
    fn at(self, now: DateTime<Utc>) -> Listing {
        let created_at = now - self.age;
        Listing {
            id: ListingId(self.id.to_string()),
            title: self.title.to_string(),
            property_type: self.property_type,
            purpose: self.purpose,
            agent_id: self.agent_id.to_string(),
            city: self.city.to_string(),
            price: self.price,
            status: self.status,
            created_at,
            updated_at: created_at,
        }
    }
}

pub(crate) fn seed_listings(now: DateTime<Utc>) -> Vec<Listing> {
    use ListingPurpose::{Rent, Sale};
    use PropertyStatus::*;
    use PropertyType::*;

    [
        SeedListing {
            id: "prop-001",
            title: "Rumah Minimalis Dekat Kampus",
            property_type: House,
            purpose: Sale,
            agent_id: "agent-budi",
            city: "Yogyakarta",
            price: 875_000_000,
            status: Pending,
            age: Duration::hours(5),
        },
        SeedListing {
            id: "prop-002",
            title: "Apartemen Studio Sudirman",
            property_type: Apartment,
            purpose: Rent,
            agent_id: "agent-sari",
            city: "Jakarta",
            price: 6_500_000,
            status: Approved,
            age: Duration::days(2),
        },
        SeedListing {
            id: "prop-003",
            title: "Villa Tebing Uluwatu",
            property_type: Villa,
            purpose: Sale,
            agent_id: "agent-rina",
            city: "Badung",
            price: 12_400_000_000,
            status: Published,
            age: Duration::days(12),
        },
        SeedListing {
            id: "prop-004",
            title: "Ruko Dua Lantai Jalan Raya",
            property_type: Shophouse,
            purpose: Rent,
            agent_id: "agent-budi",
            city: "Surabaya",
            price: 150_000_000,
            status: Unpublished,
            age: Duration::days(45),
        },
        SeedListing {
            id: "prop-005",
            title: "Tanah Kavling Siap Bangun",
            property_type: Land,
            purpose: Sale,
            agent_id: "agent-sari",
            city: "Bogor",
            price: 640_000_000,
            status: Rejected,
            age: Duration::days(90),
        },
        SeedListing {
            id: "prop-006",
            title: "Kantor Siap Pakai Kuningan",
            property_type: Office,
            purpose: Rent,
            agent_id: "agent-rina",
            city: "Jakarta",
            price: 45_000_000,
            status: Pending,
            age: Duration::days(400),
        },
    ]
    .into_iter()
    .map(|seed| seed.at(now))
    .collect()
}

struct DemoAccount {
    password_digest: String,
    admin: bool,
    confirmed: bool,
}

fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.to_ascii_lowercase().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Stand-in for the hosted auth provider, backed by seeded demo accounts.
#[derive(Clone)]
pub(crate) struct DemoAuthDirectory {
    accounts: Arc<RwLock<BTreeMap<String, DemoAccount>>>,
}

impl DemoAuthDirectory {
    pub(crate) fn seeded() -> Self {
        let mut accounts = BTreeMap::new();
        for (email, password, admin, confirmed) in [
            ("admin@propertyhub.id", "admin-demo", true, true),
            ("budi@propertyhub.id", "agen-demo", false, true),
            ("baru@propertyhub.id", "baru-demo", false, false),
        ] {
            accounts.insert(
                email.to_string(),
                DemoAccount {
                    password_digest: password_digest(email, password),
                    admin,
                    confirmed,
                },
            );
        }
        Self {
            accounts: Arc::new(RwLock::new(accounts)),
        }
    }

    fn verify(&self, credentials: &Credentials) -> Result<bool, &'static str> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        let email = credentials.email.trim().to_ascii_lowercase();
        let account = accounts
            .get(&email)
            .ok_or("Invalid login credentials")?;

        if account.password_digest != password_digest(&email, &credentials.password) {
            return Err("Invalid login credentials");
        }
        if !account.confirmed {
            return Err("Email not confirmed");
        }
        Ok(account.admin)
    }
}

impl AuthSessionFactory for DemoAuthDirectory {
    type Session = DemoAuthSession;

    fn session(&self) -> Self::Session {
        DemoAuthSession {
            directory: self.clone(),
            authenticated: AtomicBool::new(false),
            admin: AtomicBool::new(false),
            loading: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }
}

pub(crate) struct DemoAuthSession {
    directory: DemoAuthDirectory,
    authenticated: AtomicBool,
    admin: AtomicBool,
    loading: AtomicBool,
    error: Mutex<Option<String>>,
}

#[async_trait]
impl AuthProvider for DemoAuthSession {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthFailure> {
        self.loading.store(true, Ordering::Release);
        let verdict = self.directory.verify(credentials);
        self.loading.store(false, Ordering::Release);

        match verdict {
            Ok(admin) => {
                self.authenticated.store(true, Ordering::Release);
                self.admin.store(admin, Ordering::Release);
                Ok(())
            }
            Err(raw) => {
                *lock(&self.error) = Some(raw.to_string());
                Err(AuthFailure(raw.to_string()))
            }
        }
    }

    async fn sign_out(&self) {
        self.authenticated.store(false, Ordering::Release);
        self.admin.store(false, Ordering::Release);
    }

    fn error(&self) -> Option<String> {
        lock(&self.error).clone()
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    fn is_admin(&self) -> bool {
        self.admin.load(Ordering::Acquire)
    }

    fn loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    fn clear_error(&self) {
        *lock(&self.error) = None;
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<PropertyStatus, String> {
    raw.parse::<PropertyStatus>().map_err(|err| err.to_string())
}
