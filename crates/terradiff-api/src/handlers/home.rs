use axum::response::Html;

/// The map page itself is a separate frontend; this placeholder keeps `/`
/// serving something useful for humans poking at the API.
pub async fn home() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
