use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Women in Engineering Directory API",
        version = "1.0.0",
        description = "Directory of women engineers for schools.\n\n**Authentication:** protected endpoints expect a Firebase ID token as `Authorization: Bearer <token>`. Admin and engineer endpoints additionally require the matching custom claim.\n\n**Conventions:** every response carries a human readable `msg` header. Listing endpoints return totals in the `count` header and search returns `totalPages`."
    ),
    paths(
        // Health
        crate::api::health::hello,
        crate::api::health::health_check,

        // Engineers
        crate::api::engineers::engineers_to_review,
        crate::api::engineers::review_engineer,
        crate::api::engineers::signup,
        crate::api::engineers::get_feedback,
        crate::api::engineers::admin_get_all_engineers,
        crate::api::engineers::get_engineer,
        crate::api::engineers::delete_engineer,
        crate::api::engineers::update_engineer,
        crate::api::engineers::resubmit_engineer,

        // Users
        crate::api::users::all_user_feedback,
        crate::api::users::forget_password,
        crate::api::users::signup,
        crate::api::users::signup_admin,
        crate::api::users::admin_get_all_users,
        crate::api::users::submit_user_feedback,
        crate::api::users::contact,
        crate::api::users::add_favourite,
        crate::api::users::delete_favourite,
        crate::api::users::favourites,
        crate::api::users::user_details,
        crate::api::users::delete_user,

        // Search
        crate::api::search::search,
        crate::api::search::all_topics,

        // Testing
        crate::api::testing::user_token,
        crate::api::testing::change_user_claim,
        crate::api::testing::testing_client_email,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,

            crate::models::ProfileState,
            crate::models::Event,
            crate::models::EngineerDto,
            crate::models::AdminEngineerItem,
            crate::models::EngineerCardDto,
            crate::models::SignupEngineerRequest,
            crate::models::EngineerProfileUpdate,
            crate::models::ReviewRequest,
            crate::models::ReviewFeedback,

            crate::models::Role,
            crate::models::UserProfileDto,
            crate::models::AdminUserItem,
            crate::models::SignupUserRequest,
            crate::models::SignupAdminRequest,
            crate::models::PasswordResetRequest,
            crate::models::FavouriteRequest,
            crate::models::SubmitUserFeedbackRequest,
            crate::models::ContactRequest,
            crate::models::UserFeedbackDto,
            crate::models::MonthlyFeedback,

            crate::models::SearchRequest,
            crate::models::TopicDto,

            crate::models::ChangeClaimRequest,
            crate::models::UserIdRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness endpoints."),
        (name = "Engineers", description = "Engineer signup, profile maintenance and the admin review workflow."),
        (name = "Users", description = "Student, teacher and admin accounts, favourites and site feedback."),
        (name = "Search", description = "Full-text search over verified engineers and the topic catalogue."),
        (name = "Testing", description = "Helpers for end-to-end tests. Only mounted when ENABLE_TESTING_ROUTES is set."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Firebase ID token"))
                        .build()
                ),
            );
        }
    }
}
