//! Deterministic fixtures for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::Service;
use crate::config::Config;
use crate::core::{Priority, PropertyId, RequestType, Role, TimeSource, UserId};
use crate::engine::{CallerIdentity, CreateRequest, Tracker};

/// Manually advanced clock.
#[derive(Clone)]
pub struct TestClock {
    now: Arc<AtomicU64>,
}

impl TestClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set_ms(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl TimeSource for TestClock {
    fn now_ms(&self) -> u64 {
        self.now_ms()
    }
}

/// A service on a pinned clock, plus helpers for seeding the roster.
pub struct TestWorld {
    clock: TestClock,
    pub service: Service,
}

impl TestWorld {
    pub fn new(start_ms: u64) -> Self {
        Self::with_config(start_ms, Config::default())
    }

    pub fn with_config(start_ms: u64, config: Config) -> Self {
        let clock = TestClock::new(start_ms);
        let tracker = Tracker::with_clock(config, Arc::new(clock.clone()));
        Self {
            clock,
            service: Service::new(tracker),
        }
    }

    pub fn clock(&self) -> &TestClock {
        &self.clock
    }

    pub fn add_role(&mut self, property: &str, user: &str, role: Role) {
        self.service.tracker_mut().upsert_role(
            PropertyId::new(property).expect("valid property id"),
            UserId::new(user).expect("valid user id"),
            role,
            true,
        );
    }

    pub fn add_manager(&mut self, property: &str, user: &str) {
        self.add_role(property, user, Role::Manager);
    }

    pub fn add_tenant(&mut self, property: &str, user: &str) {
        self.add_role(property, user, Role::Tenant);
    }

    pub fn add_vendor(&mut self, property: &str, user: &str) {
        self.add_role(property, user, Role::Vendor);
    }

    pub fn add_technician(&mut self, property: &str, user: &str) {
        self.add_role(property, user, Role::FieldTechnician);
    }
}

/// A caller for the given user id.
pub fn caller(user: &str) -> CallerIdentity {
    CallerIdentity::new(UserId::new(user).expect("valid user id"))
}

/// A plain creation input for the given property.
pub fn plumbing_request(property: &str) -> CreateRequest {
    CreateRequest {
        property_id: PropertyId::new(property).expect("valid property id"),
        unit_id: None,
        request_type: RequestType::Plumbing,
        priority: Priority::High,
        title: "Leaking kitchen tap".to_string(),
        description: "Tap drips constantly, getting worse".to_string(),
        location: "Kitchen".to_string(),
        photos: Vec::new(),
    }
}
