use crate::brochures::BULK_LIMIT;
use crate::domain::{City, Extents, FilterOutcome, SiteFilter, SiteView};
use crate::templates::{card, desktop_layout};
use maud::{html, Markup, PreEscaped};
use serde::Serialize;

pub struct DashboardVm<'a> {
    pub filter: &'a SiteFilter,
    pub outcome: &'a FilterOutcome,
    pub type_options: &'a [String],
    pub city_options: &'a [String],
    pub extents: Extents,
    /// Current query pairs, minus the bulk count.
    pub carried: Vec<(String, String)>,
    pub export_href: String,
    pub map_center: (f64, f64),
    pub map_zoom: u8,
    pub default_max_miles: f64,
}

#[derive(Serialize)]
struct WoodlandMarker<'a> {
    name: &'a str,
    price: &'a str,
    kind: &'a str,
    size: &'a str,
    url: &'a str,
    lat: f64,
    lon: f64,
    miles: Option<f64>,
}

#[derive(Serialize)]
struct CityMarker<'a> {
    name: &'a str,
    lat: f64,
    lon: f64,
    population: Option<u64>,
}

const MAP_SCRIPT: &str = r#"
(function () {
  const cfg = JSON.parse(document.getElementById('map-data').textContent);
  const map = L.map('map', { preferCanvas: true }).setView(cfg.center, cfg.zoom);
  L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
    maxZoom: 18,
    attribution: '&copy; OpenStreetMap contributors'
  }).addTo(map);
  L.control.scale().addTo(map);

  function line(parent, text, bold) {
    const div = document.createElement('div');
    div.textContent = text;
    if (bold) { div.style.fontWeight = '600'; div.style.fontSize = '16px'; div.style.marginBottom = '4px'; }
    parent.appendChild(div);
  }

  function woodlandPopup(w) {
    const box = document.createElement('div');
    line(box, w.name, true);
    line(box, [w.price, w.kind].filter(Boolean).join(' • '));
    line(box, w.size);
    if (w.miles !== null) { line(box, 'Nearest filtered city: ' + w.miles.toFixed(1) + ' miles'); }
    const link = document.createElement('a');
    link.href = w.url;
    link.target = '_blank';
    link.rel = 'noopener';
    link.textContent = 'Open listing ↗';
    box.appendChild(link);
    return box;
  }

  function cityPopup(c) {
    const box = document.createElement('div');
    line(box, c.name, true);
    if (c.population !== null) { line(box, 'Population: ' + c.population.toLocaleString('en-GB')); }
    return box;
  }

  const woodlands = L.markerClusterGroup();
  cfg.woodlands.forEach(function (w) {
    woodlands.addLayer(L.marker([w.lat, w.lon]).bindTooltip(w.name).bindPopup(woodlandPopup(w), { maxWidth: 350 }));
  });
  woodlands.addTo(map);
  const overlays = { 'Woodlands': woodlands };

  if (cfg.cities.length) {
    const cities = L.markerClusterGroup();
    cfg.cities.forEach(function (c) {
      cities.addLayer(L.circleMarker([c.lat, c.lon], { radius: 6, color: '#1d4ed8' })
        .bindTooltip(c.name).bindPopup(cityPopup(c), { maxWidth: 300 }));
    });
    cities.addTo(map);
    overlays['Cities'] = cities;
  }
  L.control.layers(null, overlays, { collapsed: false }).addTo(map);
})();
"#;

/// Marker data as JSON that is safe inside a script element.
fn map_data(vm: &DashboardVm) -> String {
    let woodlands: Vec<WoodlandMarker> = vm
        .outcome
        .sites
        .iter()
        .filter_map(|v| {
            let pos = v.site.position()?;
            let l = &v.site.listing;
            Some(WoodlandMarker {
                name: &l.name,
                price: &l.price,
                kind: &l.listing_type,
                size: &l.size,
                url: &l.url,
                lat: pos.lat,
                lon: pos.lon,
                miles: v.min_city_miles,
            })
        })
        .collect();

    let cities: Vec<CityMarker> = vm
        .outcome
        .cities
        .iter()
        .filter_map(|c| {
            let pos = c.position()?;
            Some(CityMarker {
                name: &c.name,
                lat: pos.lat,
                lon: pos.lon,
                population: c.population,
            })
        })
        .collect();

    let data = serde_json::json!({
        "center": [vm.map_center.0, vm.map_center.1],
        "zoom": vm.map_zoom,
        "woodlands": woodlands,
        "cities": cities,
    });

    data.to_string().replace("</", "<\\/")
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_default()
}

fn input_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn range_hint(extent: Option<(f64, f64)>, decimals: usize) -> String {
    match extent {
        Some((lo, hi)) => format!("{lo:.decimals$} to {hi:.decimals$}"),
        None => "no data".to_string(),
    }
}

fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn range_inputs(
    label: &str,
    prefix: &str,
    min: Option<f64>,
    max: Option<f64>,
    extent: Option<(f64, f64)>,
    decimals: usize,
) -> Markup {
    html! {
        fieldset {
            legend { (label) }
            small class="caption" { (range_hint(extent, decimals)) }
            label {
                "Min "
                input type="number" step="any" name=(format!("{prefix}_min")) value=(input_value(min));
            }
            label {
                "Max "
                input type="number" step="any" name=(format!("{prefix}_max")) value=(input_value(max));
            }
        }
    }
}

fn filter_form(vm: &DashboardVm) -> Markup {
    let f = vm.filter;
    let miles = f.max_miles.unwrap_or(vm.default_max_miles);

    html! {
        form method="get" action="/" {
            h3 { "Filters" }

            @if !vm.type_options.is_empty() {
                fieldset {
                    legend { "Type" }
                    @for t in vm.type_options {
                        label {
                            input type="checkbox" name="type" value=(t) checked[f.types.contains(t)];
                            " " (t)
                        }
                    }
                }
            }

            (range_inputs("Price (£)", "price", f.price.min, f.price.max, vm.extents.price, 0))
            (range_inputs("Size (acres)", "acres", f.acres.min, f.acres.max, vm.extents.acres, 2))
            (range_inputs("Area (m²)", "m2", f.square_metres.min, f.square_metres.max, vm.extents.square_metres, 0))
            (range_inputs("√Area (m)", "side", f.side_metres.min, f.side_metres.max, vm.extents.side_metres, 1))

            @if !vm.city_options.is_empty() {
                fieldset {
                    legend { "Nearest City" }
                    @for c in vm.city_options {
                        label {
                            input type="checkbox" name="city" value=(c) checked[f.nearest_cities.contains(c)];
                            " " (c)
                        }
                    }
                }
            }

            fieldset {
                legend { "Cities" }
                label {
                    input type="checkbox" name="hide_cities" value="1" checked[!f.show_cities];
                    " Hide city layer"
                }
                label {
                    "Population min "
                    input type="number" step="1000" name="pop_min" value=(input_value(f.population.min));
                }
                label {
                    "Population max "
                    input type="number" step="1000" name="pop_max" value=(input_value(f.population.max));
                }
                small class="caption" { (range_hint(vm.extents.population, 0)) }
            }

            fieldset {
                legend { "Distance" }
                label {
                    input type="checkbox" name="near" value="on" checked[f.max_miles.is_some()];
                    " Enable distance filter to nearest (filtered) city"
                }
                label {
                    "Max distance (miles) "
                    input type="number" name="max_miles" min="5" max="150" step="5" value=(miles);
                }
            }

            button type="submit" { "Apply" }
            " "
            a href="/" { "Reset" }
        }
    }
}

fn woodlands_table(sites: &[SiteView]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    @for h in ["Name", "Price", "Type", "Size", "SizeAcres", "Size_m2", "Size_m2_sqrt",
                               "Latitude", "Longitude", "NearestCity", "MinCityMiles", "URL"] {
                        th { (h) }
                    }
                }
            }
            tbody {
                @for v in sites {
                    @let l = &v.site.listing;
                    @let m = &v.site.measures;
                    tr {
                        td { (l.name) }
                        td { (l.price) }
                        td { (l.listing_type) }
                        td { (l.size) }
                        td { (fixed(m.acres, 2)) }
                        td { (fixed(m.square_metres, 0)) }
                        td { (fixed(m.side_metres, 1)) }
                        td { (fixed(l.latitude, 5)) }
                        td { (fixed(l.longitude, 5)) }
                        td { (v.site.nearest_city.as_deref().unwrap_or("")) }
                        td { (fixed(v.min_city_miles, 1)) }
                        td { a href=(l.url) target="_blank" rel="noopener" { "link" } }
                    }
                }
            }
        }
    }
}

fn cities_table(cities: &[City]) -> Markup {
    html! {
        table {
            thead { tr { th { "City" } th { "Latitude" } th { "Longitude" } th { "Population" } } }
            tbody {
                @for c in cities {
                    tr {
                        td { (c.name) }
                        td { (fixed(c.latitude, 4)) }
                        td { (fixed(c.longitude, 4)) }
                        td { (c.population.map(thousands).unwrap_or_default()) }
                    }
                }
            }
        }
    }
}

fn brochure_panel(vm: &DashboardVm) -> Markup {
    let sites = &vm.outcome.sites;
    let max_n = sites.len().min(BULK_LIMIT);

    html! {
        (card("Download brochure", html! {
            @if sites.is_empty() {
                p { "No woodlands match the current filters." }
            } @else {
                form method="get" action="/brochure" {
                    label for="brochure-url" { "Choose a woodland " }
                    select id="brochure-url" name="url" {
                        @for v in sites {
                            option value=(v.site.listing.url) { (v.site.listing.name) }
                        }
                    }
                    " "
                    button type="submit" { "Download PDF" }
                }
            }
        }))

        (card(&format!("Bulk download PDFs (max {BULK_LIMIT})"), html! {
            @if max_n == 0 {
                p { "Nothing to download." }
            } @else {
                form method="get" action="/brochures.zip" {
                    @for (k, v) in &vm.carried {
                        input type="hidden" name=(k) value=(v);
                    }
                    label {
                        "How many of the filtered sites "
                        input type="number" name="n" min="1" max=(max_n) value=(max_n);
                    }
                    " "
                    button type="submit" { "Fetch and bundle" }
                }
                details {
                    summary { "Preview the first " (max_n) " sites" }
                    ol {
                        @for v in sites.iter().take(max_n) {
                            li { (v.site.listing.name) }
                        }
                    }
                }
            }
        }))
    }
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    let outcome = vm.outcome;

    desktop_layout(
        "UK Woodlands Map",
        html! {
            div class="layout" {
                aside { (filter_form(vm)) }
                main {
                    @if let Some(notice) = &outcome.notice {
                        p class="notice" { (notice) }
                    }
                    p class="caption" {
                        "Woodlands: " (outcome.sites.len())
                        "  |  Cities (after population filter): " (outcome.cities.len())
                        "  |  "
                        a href=(vm.export_href) { "Export table (.xlsx)" }
                    }
                    div id="map" {}
                    script id="map-data" type="application/json" { (PreEscaped(map_data(vm))) }
                    script { (PreEscaped(MAP_SCRIPT)) }

                    details open {
                        summary { "Woodlands table" }
                        (woodlands_table(&outcome.sites))
                    }
                    @if !outcome.cities.is_empty() {
                        details {
                            summary { "Cities table" }
                            (cities_table(&outcome.cities))
                        }
                    }

                    (brochure_panel(vm))
                }
            }
        },
    )
}
