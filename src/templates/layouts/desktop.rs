use maud::{html, Markup, PreEscaped, DOCTYPE};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const CLUSTER_CSS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css";
const CLUSTER_DEFAULT_CSS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css";
const CLUSTER_JS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2933; }
header { display: flex; align-items: center; gap: 0.75rem; padding: 0.75rem 1.5rem; box-shadow: 0 1px 4px rgba(0,0,0,.15); }
header h3 { margin: 0; }
.layout { display: grid; grid-template-columns: 300px 1fr; min-height: calc(100vh - 56px); }
aside { padding: 1rem; border-right: 1px solid #e4e7eb; overflow-y: auto; }
aside fieldset { border: 1px solid #e4e7eb; border-radius: 6px; margin-bottom: 0.75rem; }
aside label { display: block; font-size: 0.9rem; }
aside input[type=number] { width: 6.5rem; }
main { padding: 1rem 1.5rem; overflow-x: auto; }
#map { height: 650px; border-radius: 6px; }
.notice { background: #fff8e1; border: 1px solid #f0c36d; padding: 0.5rem 0.75rem; border-radius: 6px; }
.caption { color: #52606d; font-size: 0.9rem; }
table { border-collapse: collapse; font-size: 0.85rem; margin-bottom: 1.5rem; }
th, td { border-bottom: 1px solid #e4e7eb; padding: 0.3rem 0.5rem; text-align: left; }
.card { border: 1px solid #e4e7eb; border-radius: 6px; padding: 0.75rem 1rem; margin-bottom: 1rem; }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(LEAFLET_CSS);
                link rel="stylesheet" href=(CLUSTER_CSS);
                link rel="stylesheet" href=(CLUSTER_DEFAULT_CSS);
                style { (PreEscaped(STYLE)) }
                script src=(LEAFLET_JS) {}
                script src=(CLUSTER_JS) {}
            }
            body {
                header {
                    svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="24"
                        height="24"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="#2f7d32"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                    {
                        path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                        path d="M12 13l-2 -2" {}
                        path d="M12 12l2 -2" {}
                        path d="M12 21v-13" {}
                        path d="M9.824 16a3 3 0 0 1 -2.743 -3.69a3 3 0 0 1 .304 -4.833a3 3 0 0 1 4.615 -3.707a3 3 0 0 1 4.614 3.707a3 3 0 0 1 .305 4.833a3 3 0 0 1 -2.919 3.695h-4z" {}
                    }
                    h3 { "UK Woodlands for Sale" }
                }
                (content)
            }
        }
    }
}
