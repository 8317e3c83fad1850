use crate::domain::artifact::{Legend, MapArtifact};
use crate::utils::error::Result;
use serde::Serialize;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const AWESOME_MARKERS_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css";
const AWESOME_MARKERS_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js";
const GLYPHICONS_CSS: &str = "https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CircleOptions<'a> {
    radius: f64,
    color: &'a str,
    weight: u32,
    fill: bool,
    dash_array: &'a str,
}

/// Serializes a value for inline use inside a `<script>` block.
fn js<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders a self-contained Leaflet page. Output depends only on the artifact.
pub fn to_html(artifact: &MapArtifact) -> Result<String> {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
    );
    html.push_str("<title>Drive Time Map</title>\n");
    for css in [LEAFLET_CSS, AWESOME_MARKERS_CSS, GLYPHICONS_CSS] {
        html.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\" />\n", css));
    }
    // awesome-markers extends `L`, so Leaflet loads first.
    for script in [LEAFLET_JS, AWESOME_MARKERS_JS] {
        html.push_str(&format!("<script src=\"{}\"></script>\n", script));
    }
    html.push_str(
        "<style>html, body { width: 100%; height: 100%; margin: 0; padding: 0; } \
         #map { position: absolute; top: 0; bottom: 0; right: 0; left: 0; }</style>\n",
    );
    html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n");

    html.push_str(&render_legend(&artifact.legend));

    html.push_str("<script>\n");
    html.push_str(&format!(
        "var map = L.map(\"map\").setView([{}, {}], {});\n",
        artifact.center_latitude, artifact.center_longitude, artifact.zoom_start
    ));
    html.push_str(&format!(
        "L.tileLayer({}, {{ attribution: {}, maxZoom: 19 }}).addTo(map);\n",
        js(TILE_URL)?,
        js(TILE_ATTRIBUTION)?
    ));

    for layer in &artifact.isochrone_layers {
        html.push_str(&format!(
            "L.geoJSON({}, {{ style: function () {{ return {}; }} }}).bindTooltip({}).addTo(map);\n",
            js(&layer.geometry)?,
            js(&layer.style)?,
            js(&layer.tooltip)?
        ));
    }

    let radius = &artifact.radius;
    let circle = CircleOptions {
        radius: radius.radius_meters,
        color: &radius.color,
        weight: radius.weight,
        fill: radius.fill,
        dash_array: &radius.dash_array,
    };
    html.push_str(&format!(
        "L.circle([{}, {}], {}).bindPopup({}).addTo(map);\n",
        radius.latitude,
        radius.longitude,
        js(&circle)?,
        js(&radius.popup)?
    ));

    let marker = &artifact.marker;
    html.push_str(&format!(
        "L.marker([{}, {}], {{ icon: L.AwesomeMarkers.icon({}) }}).bindPopup({}).addTo(map);\n",
        marker.latitude,
        marker.longitude,
        js(&marker.icon)?,
        js(&marker.popup)?
    ));

    html.push_str("</script>\n</body>\n</html>\n");
    Ok(html)
}

fn render_legend(legend: &Legend) -> String {
    let mut html = String::new();
    html.push_str(
        "<div class=\"legend\" style=\"position: fixed; bottom: 50px; left: 50px; width: 200px; \
         background-color: white; border: 2px solid grey; border-radius: 6px; z-index: 9999; \
         padding: 12px; box-shadow: 0 2px 4px rgba(0,0,0,0.2);\">\n",
    );
    html.push_str(&format!(
        "<h4 style=\"margin-bottom: 10px; border-bottom: 1px solid #ccc; padding-bottom: 5px;\">{}</h4>\n",
        escape_html(&legend.title)
    ));

    html.push_str("<div style=\"margin: 5px 0;\">\n");
    for entry in &legend.entries {
        let color = escape_html(&entry.color);
        html.push_str(&format!(
            "<div style=\"display: flex; align-items: center; margin: 5px 0;\">\
             <div style=\"width: 20px; height: 20px; background: {0}; opacity: 0.3; \
             border: 2px solid {0}; margin-right: 10px;\"></div><span>{1}</span></div>\n",
            color,
            escape_html(&entry.label)
        ));
    }
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<div style=\"margin-top: 10px; border-top: 1px solid #ccc; padding-top: 5px;\">\
         <div style=\"display: flex; align-items: center;\">\
         <div style=\"width: 20px; height: 2px; border-top: 2px dashed {}; margin-right: 10px;\"></div>\
         <span>{}</span></div></div>\n",
        escape_html(&legend.radius_color),
        escape_html(&legend.radius_label)
    ));
    html.push_str("</div>\n");
    html
}
