use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-brain"></i> {" NeuroScan AI"}</h1>
            <p class="subtitle">{"Brain tumor classification from MRI scans"}</p>
        </header>
    }
}
