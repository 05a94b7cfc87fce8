//! Data source for the `VanEdu` admin API

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod repository;
pub mod seed;

pub use repository::{InMemoryRepository, Record, Repository};

use std::sync::Arc;
use tracing::info;
use vanedu_core::config::DataConfig;
use vanedu_core::{Category, Payment, Result, SubscriptionPlan, User};

/// One repository per resource collection
#[derive(Debug, Clone)]
pub struct Store {
    /// User accounts
    pub users: Arc<dyn Repository<User>>,

    /// Course categories
    pub categories: Arc<dyn Repository<Category>>,

    /// Subscription plans
    pub plans: Arc<dyn Repository<SubscriptionPlan>>,

    /// Plan payments
    pub payments: Arc<dyn Repository<Payment>>,
}

/// Record counts per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    /// Users
    pub users: usize,
    /// Categories
    pub categories: usize,
    /// Subscription plans
    pub plans: usize,
    /// Payments
    pub payments: usize,
}

impl Store {
    /// Build a store from explicit repositories
    #[must_use]
    pub fn new(
        users: Arc<dyn Repository<User>>,
        categories: Arc<dyn Repository<Category>>,
        plans: Arc<dyn Repository<SubscriptionPlan>>,
        payments: Arc<dyn Repository<Payment>>,
    ) -> Self {
        Self {
            users,
            categories,
            plans,
            payments,
        }
    }

    /// In-memory store holding the sample records from [`seed`]
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::with_records(seed::users())),
            Arc::new(InMemoryRepository::with_records(seed::categories())),
            Arc::new(InMemoryRepository::with_records(seed::subscription_plans())),
            Arc::new(InMemoryRepository::with_records(seed::payments())),
        )
    }

    /// In-memory store with no records
    #[must_use]
    pub fn empty() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
        )
    }

    /// In-memory store as configured
    #[must_use]
    pub fn from_config(config: &DataConfig) -> Self {
        if config.seed {
            info!("Loading sample records into in-memory store");
            Self::seeded()
        } else {
            info!("Starting with an empty in-memory store");
            Self::empty()
        }
    }

    /// Count the records in every collection
    ///
    /// # Errors
    ///
    /// Returns an error if any repository fails to count.
    pub async fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            users: self.users.count().await?,
            categories: self.categories.count().await?,
            plans: self.plans.count().await?,
            payments: self.payments.count().await?,
        })
    }
}
