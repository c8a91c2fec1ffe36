use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use minijinja::context;

use super::today;
use crate::{
    error::Result,
    forms::{FormData, MonsterForm, ValidatedForm},
    session::{FlashMessage, FlashMessages, Session},
    state::AppState,
    templates::TemplateResponse,
};

const TEMPLATE: &str = "form_validation.html";
const URL: &str = "/form-validation/";

pub async fn form_validation(flash: FlashMessages) -> TemplateResponse {
    let form = MonsterForm::full(today());
    TemplateResponse::new(
        TEMPLATE,
        context! { form => form.form(), messages => flash.rendered() },
    )
}

/// Create on success and come back to an empty form with a message;
/// otherwise show the form again with its errors.
pub async fn form_validation_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let mut form = MonsterForm::bind_full(&FormData::from(pairs), today());

    if form.is_valid() {
        if let Some(new) = form.cleaned().cloned() {
            let monster = state.store().create(new).await?;
            tracing::info!(monster_id = monster.id, name = %monster.name, "Created monster from form");

            FlashMessages::push(
                &session,
                FlashMessage::info(format!(
                    "Monster {} created. You can make another.",
                    monster.name
                )),
            )
            .await?;
            return Ok(Redirect::to(URL).into_response());
        }
    }

    Ok(TemplateResponse::new(TEMPLATE, context! { form => form.form() }).into_response())
}

#[cfg(test)]
mod tests {
    use crate::testing::{body_string, empty_state, form_post, get_request, htmx_get};
    use crate::views::{router, today};
    use axum::http::{
        header::{COOKIE, LOCATION, SET_COOKIE},
        StatusCode,
    };
    use chrono::{Days, Months};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_valid_post_redirects_and_flashes_once() {
        let state = empty_state();
        let app = router(state.clone()).unwrap();

        let response = app
            .clone()
            .oneshot(form_post(
                "/form-validation/",
                "name=Agnes&is_happy=on&date_of_birth=2020-02-02&kind=troll",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/form-validation/");
        assert_eq!(state.store().count().await.unwrap(), 1);

        let cookie = response.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let mut request = get_request("/form-validation/");
        request.headers_mut().insert(COOKIE, cookie.parse().unwrap());
        let body = body_string(app.clone().oneshot(request).await.unwrap()).await;
        assert!(body.contains("Monster Agnes created. You can make another."));

        let mut request = get_request("/form-validation/");
        request.headers_mut().insert(COOKIE, cookie.parse().unwrap());
        let body = body_string(app.oneshot(request).await.unwrap()).await;
        assert!(!body.contains("Monster Agnes created."));
    }

    #[tokio::test]
    async fn test_invalid_post_shows_field_and_form_errors() {
        let state = empty_state();
        let old = today().checked_sub_months(Months::new(12 * 11)).unwrap();
        let body = body_string(
            router(state.clone())
                .unwrap()
                .oneshot(form_post(
                    "/form-validation/",
                    &format!("name=Dr+Who&is_happy=on&date_of_birth={old}&kind=ogre"),
                ))
                .await
                .unwrap(),
        )
        .await;

        assert!(body.contains("honorifics"));
        assert!(body.contains("Monsters older than 10 years cannot be happy."));
        assert_eq!(state.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validate_single_field_returns_only_its_row() {
        let tomorrow = today().checked_add_days(Days::new(1)).unwrap();
        let uri = format!(
            "/form-validation/?name=Boris&date_of_birth={tomorrow}&kind=troll&_validate_field=date_of_birth"
        );
        let response = router(empty_state())
            .unwrap()
            .oneshot(htmx_get(&uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("id=\"field-date_of_birth\""));
        assert!(body.contains("Date of birth cannot be in the future."));
        assert!(!body.contains("field-name"));
        assert!(!body.contains("<html"));
    }

    #[tokio::test]
    async fn test_validate_unknown_field_is_400() {
        let response = router(empty_state())
            .unwrap()
            .oneshot(htmx_get("/form-validation/?_validate_field=colour"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
