use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::middlewares::AUTH_TOKEN;

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    AUTH_TOKEN,
                    "JWT issued to the instructor",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::drafts::draft_create_handler,
        crate::web::routes::drafts::draft_get_handler,
        crate::web::routes::drafts::draft_close_handler,
        crate::web::routes::drafts::draft_basics_handler,
        crate::web::routes::drafts::draft_pricing_handler,
        crate::web::routes::drafts::draft_selection_handler,
        crate::web::routes::drafts::draft_step_handler,
        crate::web::routes::drafts::draft_next_step_handler,
        crate::web::routes::drafts::draft_previous_step_handler,
        crate::web::routes::drafts::draft_save_handler,
        crate::web::routes::drafts::saved_page_handler,
        crate::web::routes::drafts::saved_open_handler,
        crate::web::routes::drafts::saved_delete_handler,
        crate::web::routes::curriculum::section_create_handler,
        crate::web::routes::curriculum::sections_reorder_handler,
        crate::web::routes::curriculum::section_update_handler,
        crate::web::routes::curriculum::section_delete_handler,
        crate::web::routes::curriculum::lecture_create_handler,
        crate::web::routes::curriculum::lectures_move_within_handler,
        crate::web::routes::curriculum::lecture_update_handler,
        crate::web::routes::curriculum::lecture_delete_handler,
        crate::web::routes::curriculum::lecture_move_across_handler,
        crate::web::routes::drag::drag_start_handler,
        crate::web::routes::drag::drag_hover_handler,
        crate::web::routes::drag::drag_nudge_handler,
        crate::web::routes::drag::drag_drop_handler,
        crate::web::routes::drag::drag_cancel_handler,
    ),
    modifiers(&CookieAuthModifier),
    tags(
        (name = "drafts", description = "Authoring sessions, wizard steps and saved drafts"),
        (name = "curriculum", description = "Sections and lectures of a draft"),
        (name = "drag", description = "Pointer and keyboard reordering"),
    ),
)]
pub struct ApiDoc;
