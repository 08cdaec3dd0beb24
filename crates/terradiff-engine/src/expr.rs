//! Earth Engine expression-graph construction.
//!
//! The REST API evaluates a serialized expression: a table of numbered value
//! nodes plus the id of the result node, where nodes refer to each other by
//! `valueReference`. The helpers here build the three graph shapes the client
//! posts: composite statistics, composite images for tile rendering, and the
//! per-observation series table.

use serde_json::{json, Map, Value};
use terradiff_core::indices::{BandMath, IndexDefinition};
use terradiff_core::models::{Aoi, DateRange};
use terradiff_core::ports::{MAX_PIXELS, REDUCTION_SCALE};

/// Accumulates numbered value nodes; `finish` wraps them with the result id.
struct Graph {
    values: Map<String, Value>,
    next: usize,
}

impl Graph {
    fn new() -> Self {
        Self { values: Map::new(), next: 0 }
    }

    fn push(&mut self, node: Value) -> String {
        let id = self.next.to_string();
        self.next += 1;
        self.values.insert(id.clone(), node);
        id
    }

    fn constant(&mut self, value: Value) -> String {
        self.push(json!({ "constantValue": value }))
    }

    fn invoke(&mut self, function: &str, arguments: Value) -> String {
        self.push(json!({
            "functionInvocationValue": {
                "functionName": function,
                "arguments": arguments,
            }
        }))
    }

    fn finish(self, result: &str) -> Value {
        json!({ "values": self.values, "result": result })
    }
}

fn reference(id: &str) -> Value {
    json!({ "valueReference": id })
}

/// A bare constant expression; used as the startup handshake.
pub fn constant_expression(value: Value) -> Value {
    let mut graph = Graph::new();
    let id = graph.constant(value);
    graph.finish(&id)
}

/// Mean + stdDev of the composite over the AOI at the fixed reduction scale.
pub fn composite_stats(def: &IndexDefinition, aoi: &Aoi, range: &DateRange) -> Value {
    let mut graph = Graph::new();
    let geometry = aoi_geometry(&mut graph, aoi);
    let composite = clipped_composite(&mut graph, def, &geometry, range);
    let reducer = combined_reducer(&mut graph);
    let scale = graph.constant(json!(REDUCTION_SCALE));
    let max_pixels = graph.constant(json!(MAX_PIXELS));
    let stats = graph.invoke(
        "Image.reduceRegion",
        json!({
            "image": reference(&composite),
            "reducer": reference(&reducer),
            "geometry": reference(&geometry),
            "scale": reference(&scale),
            "maxPixels": reference(&max_pixels),
        }),
    );
    graph.finish(&stats)
}

/// The composite image itself, for the tile-serving `maps` endpoint.
pub fn composite_image(def: &IndexDefinition, aoi: &Aoi, range: &DateRange) -> Value {
    let mut graph = Graph::new();
    let geometry = aoi_geometry(&mut graph, aoi);
    let composite = clipped_composite(&mut graph, def, &geometry, range);
    graph.finish(&composite)
}

/// A feature collection with one `{date, value}` feature per observation,
/// where `value` is the observation's AOI mean and may come back null.
pub fn series_table(def: &IndexDefinition, aoi: &Aoi, range: &DateRange) -> Value {
    let mut graph = Graph::new();
    let geometry = aoi_geometry(&mut graph, aoi);
    let collection = index_collection(&mut graph, def, &geometry, range);

    // Per-image body: Feature(null, {date: acquisition date, value: AOI mean}).
    let image = graph.push(json!({ "argumentReference": "img" }));
    let acquired = graph.invoke("Image.date", json!({ "image": reference(&image) }));
    let format = graph.constant(json!("YYYY-MM-dd"));
    let date = graph.invoke(
        "Date.format",
        json!({ "date": reference(&acquired), "format": reference(&format) }),
    );
    let reducer = graph.invoke("Reducer.mean", json!({}));
    let scale = graph.constant(json!(REDUCTION_SCALE));
    let region = graph.invoke(
        "Image.reduceRegion",
        json!({
            "image": reference(&image),
            "reducer": reference(&reducer),
            "geometry": reference(&geometry),
            "scale": reference(&scale),
        }),
    );
    let band = graph.constant(json!(def.kind.band()));
    let value = graph.invoke(
        "Dictionary.get",
        json!({ "dictionary": reference(&region), "key": reference(&band) }),
    );
    let properties = graph.push(json!({
        "dictionaryValue": {
            "values": { "date": reference(&date), "value": reference(&value) }
        }
    }));
    let feature = graph.invoke(
        "Feature",
        json!({ "geometry": { "constantValue": null }, "metadata": reference(&properties) }),
    );
    let body = graph.push(json!({
        "functionDefinitionValue": { "argumentNames": ["img"], "body": feature }
    }));
    let table = graph.invoke(
        "Collection.map",
        json!({ "collection": reference(&collection), "baseAlgorithm": reference(&body) }),
    );
    graph.finish(&table)
}

/// Temporal mean of the index collection, clipped to the AOI.
fn clipped_composite(graph: &mut Graph, def: &IndexDefinition, geometry: &str, range: &DateRange) -> String {
    let collection = index_collection(graph, def, geometry, range);
    let mean = graph.invoke("reduce.mean", json!({ "collection": reference(&collection) }));
    graph.invoke(
        "Image.clip",
        json!({ "input": reference(&mean), "geometry": reference(geometry) }),
    )
}

/// Source collection filtered to range and AOI, mapped to the single-band
/// index image per observation.
fn index_collection(graph: &mut Graph, def: &IndexDefinition, geometry: &str, range: &DateRange) -> String {
    let id = graph.constant(json!(def.collection));
    let loaded = graph.invoke("ImageCollection.load", json!({ "id": reference(&id) }));

    let start = graph.constant(json!(range.start.to_string()));
    let end = graph.constant(json!(range.end.to_string()));
    let date_filter = graph.invoke(
        "Filter.date",
        json!({ "start": reference(&start), "end": reference(&end) }),
    );
    let dated = graph.invoke(
        "Collection.filter",
        json!({ "collection": reference(&loaded), "filter": reference(&date_filter) }),
    );

    let all_field = graph.constant(json!(".all"));
    let bounds_filter = graph.invoke(
        "Filter.intersects",
        json!({ "leftField": reference(&all_field), "rightValue": reference(geometry) }),
    );
    let filtered = graph.invoke(
        "Collection.filter",
        json!({ "collection": reference(&dated), "filter": reference(&bounds_filter) }),
    );

    // Per-image body: the index band math, renamed to the output band.
    let image = graph.push(json!({ "argumentReference": "img" }));
    let index_image = match def.band_math {
        BandMath::NormalizedDifference { a, b } => {
            let bands = graph.constant(json!([a, b]));
            graph.invoke(
                "Image.normalizedDifference",
                json!({ "input": reference(&image), "bandNames": reference(&bands) }),
            )
        }
        BandMath::Expression { formula, inputs, constants } => {
            let expression = graph.constant(json!(formula));
            let mut variables = Map::new();
            for (name, band) in inputs {
                let selector = graph.constant(json!(*band));
                let selected = graph.invoke(
                    "Image.select",
                    json!({ "input": reference(&image), "bandSelectors": reference(&selector) }),
                );
                variables.insert(name.to_string(), reference(&selected));
            }
            for (name, value) in constants {
                variables.insert(name.to_string(), json!({ "constantValue": value }));
            }
            let map = graph.push(json!({ "dictionaryValue": { "values": variables } }));
            graph.invoke(
                "Image.expression",
                json!({ "expression": reference(&expression), "map": reference(&map) }),
            )
        }
    };
    let names = graph.constant(json!([def.kind.band()]));
    let renamed = graph.invoke(
        "Image.rename",
        json!({ "input": reference(&index_image), "names": reference(&names) }),
    );
    let body = graph.push(json!({
        "functionDefinitionValue": { "argumentNames": ["img"], "body": renamed }
    }));
    graph.invoke(
        "Collection.map",
        json!({ "collection": reference(&filtered), "baseAlgorithm": reference(&body) }),
    )
}

fn combined_reducer(graph: &mut Graph) -> String {
    let mean = graph.invoke("Reducer.mean", json!({}));
    let std_dev = graph.invoke("Reducer.stdDev", json!({}));
    let shared = graph.constant(json!(true));
    graph.invoke(
        "Reducer.combine",
        json!({
            "reducer1": reference(&mean),
            "reducer2": reference(&std_dev),
            "sharedInputs": reference(&shared),
        }),
    )
}

/// AOI geometry node. Always encoded as a multipolygon so one constructor
/// covers both AOI shapes.
fn aoi_geometry(graph: &mut Graph, aoi: &Aoi) -> String {
    let coordinates: Vec<Vec<Vec<[f64; 2]>>> = aoi
        .multi_polygon()
        .0
        .iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors().iter())
                .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
                .collect()
        })
        .collect();
    let coords = graph.constant(json!(coordinates));
    graph.invoke(
        "GeometryConstructors.MultiPolygon",
        json!({ "coordinates": reference(&coords) }),
    )
}
