use std::sync::Arc;

use axum::Router;
use carservice::{
    build_router, AppState, AuthConfig, InMemoryBookingRepository, InMemoryUserRepository,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub user_repository: Arc<InMemoryUserRepository>,
    pub booking_repository: Arc<InMemoryBookingRepository>,
}

pub struct TestAppBuilder {
    auth_config: AuthConfig,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            auth_config: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                token_expiration_hours: 24,
                // Lowest cost bcrypt accepts, keeps the suite fast
                bcrypt_cost: 4,
            },
        }
    }

    #[allow(dead_code)]
    pub fn with_token_expiration_hours(mut self, hours: i64) -> Self {
        self.auth_config.token_expiration_hours = hours;
        self
    }

    pub fn build(self) -> TestApp {
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let booking_repository = Arc::new(InMemoryBookingRepository::new());

        let state = AppState::new(
            user_repository.clone(),
            booking_repository.clone(),
            &self.auth_config,
        );

        TestApp {
            router: build_router(state),
            user_repository,
            booking_repository,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
