use crate::schema::{ChartSchema, DefaultValue, FieldKind, FieldSpec};

use super::ChartKind;

const NUMBER: FieldKind = FieldKind::Number {
    min: None,
    max: None,
};
const NON_NEGATIVE: FieldKind = FieldKind::Number {
    min: Some(0.0),
    max: None,
};
const SIZE: FieldKind = FieldKind::Number {
    min: Some(1.0),
    max: None,
};
const THEME: FieldKind = FieldKind::Enum(&["default", "academy", "dark"]);
const STRING_LIST: FieldKind = FieldKind::Array {
    item: &FieldKind::String,
    min_items: 1,
};
const NUMBER_LIST: FieldKind = FieldKind::Array {
    item: &NUMBER,
    min_items: 1,
};

const TITLE: FieldSpec = FieldSpec::with_default(
    "title",
    FieldKind::String,
    DefaultValue::Str(""),
    "Set the title of the chart.",
);
const STYLE: FieldSpec = FieldSpec::with_default(
    "style",
    FieldKind::Map,
    DefaultValue::EmptyObject,
    "Style overrides such as backgroundColor, palette or texture.",
);
const THEME_FIELD: FieldSpec = FieldSpec::with_default(
    "theme",
    THEME,
    DefaultValue::Str("default"),
    "Set the theme for the chart.",
);
const WIDTH: FieldSpec =
    FieldSpec::with_default("width", SIZE, DefaultValue::Num(600.0), "Set the width of the chart.");
const HEIGHT: FieldSpec = FieldSpec::with_default(
    "height",
    SIZE,
    DefaultValue::Num(400.0),
    "Set the height of the chart.",
);
const AXIS_X_TITLE: FieldSpec = FieldSpec::with_default(
    "axisXTitle",
    FieldKind::String,
    DefaultValue::Str(""),
    "Set the x-axis title of the chart.",
);
const AXIS_Y_TITLE: FieldSpec = FieldSpec::with_default(
    "axisYTitle",
    FieldKind::String,
    DefaultValue::Str(""),
    "Set the y-axis title of the chart.",
);
const GROUP: FieldSpec = FieldSpec::optional("group", FieldKind::String, "Series the item belongs to.");

const TIME_VALUE: &[FieldSpec] = &[
    FieldSpec::required("time", FieldKind::String, ""),
    FieldSpec::required("value", NUMBER, ""),
    GROUP,
];
const CATEGORY_VALUE: &[FieldSpec] = &[
    FieldSpec::required("category", FieldKind::String, ""),
    FieldSpec::required("value", NUMBER, ""),
    GROUP,
];
const NAMED_VALUE: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::String, ""),
    FieldSpec::required("value", NUMBER, ""),
    GROUP,
];
const OHLC: &[FieldSpec] = &[
    FieldSpec::required("date", FieldKind::String, "Trading date, e.g. 2024-01-02."),
    FieldSpec::required("open", NUMBER, ""),
    FieldSpec::required("high", NUMBER, ""),
    FieldSpec::required("low", NUMBER, ""),
    FieldSpec::required("close", NUMBER, ""),
    FieldSpec::optional("volume", NON_NEGATIVE, ""),
];
const TREE_NODE: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::String, ""),
    FieldSpec::optional("children", FieldKind::Array { item: &FieldKind::Any, min_items: 0 }, ""),
];
const ORG_NODE: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::String, ""),
    FieldSpec::optional("description", FieldKind::String, ""),
    FieldSpec::optional("children", FieldKind::Array { item: &FieldKind::Any, min_items: 0 }, ""),
];
const GRAPH_NODE: &[FieldSpec] = &[FieldSpec::required("name", FieldKind::String, "")];
const GRAPH_EDGE: &[FieldSpec] = &[
    FieldSpec::required("source", FieldKind::String, ""),
    FieldSpec::required("target", FieldKind::String, ""),
    FieldSpec::optional("name", FieldKind::String, ""),
];
const GRAPH: &[FieldSpec] = &[
    FieldSpec::required(
        "nodes",
        FieldKind::Array { item: &FieldKind::Object(GRAPH_NODE), min_items: 1 },
        "",
    ),
    FieldSpec::required(
        "edges",
        FieldKind::Array { item: &FieldKind::Object(GRAPH_EDGE), min_items: 0 },
        "",
    ),
];

const CATEGORY_VALUE_ITEM: FieldKind = FieldKind::Object(CATEGORY_VALUE);
const FLOW_ITEM: FieldKind = FieldKind::Object(FLOW);
const NAMED_VALUE_ITEM: FieldKind = FieldKind::Object(NAMED_VALUE);
const OHLC_ITEM: FieldKind = FieldKind::Object(OHLC);
const POINT_ITEM: FieldKind = FieldKind::Object(POINT);
const ROUTE_ITEM: FieldKind = FieldKind::Object(ROUTE);
const TIME_VALUE_ITEM: FieldKind = FieldKind::Object(TIME_VALUE);
const TREEMAP_NODE_ITEM: FieldKind = FieldKind::Object(TREEMAP_NODE);
const VENN_SET_ITEM: FieldKind = FieldKind::Object(VENN_SET);
const WORD_ITEM: FieldKind = FieldKind::Object(WORD);

const fn records(item: &'static FieldKind, description: &'static str) -> FieldSpec {
    FieldSpec::required(
        "data",
        FieldKind::Array { item, min_items: 1 },
        description,
    )
}

const AREA: &[FieldSpec] = &[
    records(&TIME_VALUE_ITEM, "Data for the area chart, such as [{ time: '2018', value: 99.9 }]."),
    FieldSpec::with_default("stack", FieldKind::Boolean, DefaultValue::Bool(false), "Whether stacking is enabled; requires a group field on every item."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE, AXIS_X_TITLE, AXIS_Y_TITLE,
];
const BAR: &[FieldSpec] = &[
    records(&CATEGORY_VALUE_ITEM, "Data for the bar chart, such as [{ category: 'A', value: 10 }]."),
    FieldSpec::with_default("group", FieldKind::Boolean, DefaultValue::Bool(false), "Whether grouping is enabled."),
    FieldSpec::with_default("stack", FieldKind::Boolean, DefaultValue::Bool(true), "Whether stacking is enabled."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE, AXIS_X_TITLE, AXIS_Y_TITLE,
];
const COLUMN: &[FieldSpec] = &[
    records(&CATEGORY_VALUE_ITEM, "Data for the column chart, such as [{ category: 'A', value: 10 }]."),
    FieldSpec::with_default("group", FieldKind::Boolean, DefaultValue::Bool(true), "Whether grouping is enabled."),
    FieldSpec::with_default("stack", FieldKind::Boolean, DefaultValue::Bool(false), "Whether stacking is enabled."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE, AXIS_X_TITLE, AXIS_Y_TITLE,
];
const CATEGORY_DISTRIBUTION: &[FieldSpec] = &[
    records(&CATEGORY_VALUE_ITEM, "Observations such as [{ category: 'A', value: 10 }]."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE, AXIS_X_TITLE, AXIS_Y_TITLE,
];
const CANDLESTICK: &[FieldSpec] = &[
    records(&OHLC_ITEM, "Price records such as [{ date: '2024-01-02', open: 10, high: 12, low: 9, close: 11 }]."),
    FieldSpec::with_default("width", SIZE, DefaultValue::Num(800.0), "Set the width of the chart."),
    FieldSpec::with_default("height", SIZE, DefaultValue::Num(600.0), "Set the height of the chart."),
    TITLE, STYLE, THEME_FIELD,
];
const DISTRICT: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::String, "Administrative region, e.g. 'Hangzhou'."),
    FieldSpec::optional("style", FieldKind::Map, ""),
    FieldSpec::optional("colors", FieldKind::Array { item: &FieldKind::String, min_items: 0 }, ""),
    FieldSpec::optional("dataType", FieldKind::Enum(&["number", "enum"]), ""),
    FieldSpec::optional("dataLabel", FieldKind::String, ""),
    FieldSpec::optional("dataValue", FieldKind::String, ""),
    FieldSpec::optional("dataValueUnit", FieldKind::String, ""),
    FieldSpec::optional("showAllSubdistricts", FieldKind::Boolean, ""),
    FieldSpec::optional("subdistricts", FieldKind::Array { item: &FieldKind::Map, min_items: 0 }, ""),
];
const DISTRICT_MAP: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::String, "Map title, at most 16 characters."),
    FieldSpec::required("data", FieldKind::Object(DISTRICT), "District to render."),
    FieldSpec::with_default("width", SIZE, DefaultValue::Num(1600.0), "Set the width of the map."),
    FieldSpec::with_default("height", SIZE, DefaultValue::Num(1000.0), "Set the height of the map."),
];
const SERIES: &[FieldSpec] = &[
    FieldSpec::required("type", FieldKind::Enum(&["column", "line"]), ""),
    FieldSpec::required("data", NUMBER_LIST, ""),
    FieldSpec::optional("axisYTitle", FieldKind::String, ""),
];
const DUAL_AXES: &[FieldSpec] = &[
    FieldSpec::required("categories", STRING_LIST, "Shared x-axis categories, e.g. ['2015', '2016']."),
    FieldSpec::required("series", FieldKind::Array { item: &FieldKind::Object(SERIES), min_items: 1 }, ""),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE, AXIS_X_TITLE,
];
const TREE_DIAGRAM: &[FieldSpec] = &[
    FieldSpec::required("data", FieldKind::Object(TREE_NODE), "Root node with nested children."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT,
];
const GRAPH_DIAGRAM: &[FieldSpec] = &[
    FieldSpec::required("data", FieldKind::Object(GRAPH), "Nodes and edges."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT,
];
const FUNNEL: &[FieldSpec] = &[
    records(&CATEGORY_VALUE_ITEM, "Stages such as [{ category: 'Visit', value: 5000 }]."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE,
];
const HISTOGRAM: &[FieldSpec] = &[
    FieldSpec::required("data", NUMBER_LIST, "Values to bin, e.g. [78, 88, 60]."),
    FieldSpec::optional("binNumber", SIZE, "Number of intervals."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE, AXIS_X_TITLE, AXIS_Y_TITLE,
];
const LINE: &[FieldSpec] = &[
    records(&TIME_VALUE_ITEM, "Data for the line chart, such as [{ time: '2015', value: 23 }]."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE, AXIS_X_TITLE, AXIS_Y_TITLE,
];
const LIQUID: &[FieldSpec] = &[
    FieldSpec::required("percent", FieldKind::Number { min: Some(0.0), max: Some(1.0) }, "Value between 0 and 1."),
    FieldSpec::with_default("shape", FieldKind::Enum(&["circle", "rect", "pin", "triangle"]), DefaultValue::Str("circle"), ""),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE,
];
const ORGANIZATION: &[FieldSpec] = &[
    FieldSpec::required("data", FieldKind::Object(ORG_NODE), "Root of the organization tree."),
    FieldSpec::with_default("orient", FieldKind::Enum(&["horizontal", "vertical"]), DefaultValue::Str("vertical"), ""),
    STYLE, THEME_FIELD, WIDTH, HEIGHT,
];
const ROUTE: &[FieldSpec] = &[FieldSpec::required(
    "data",
    STRING_LIST,
    "Points of interest along the route.",
)];
const PATH_MAP: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::String, "Map title, at most 16 characters."),
    records(&ROUTE_ITEM, "Routes such as [{ data: ['West Lake', 'Lingyin Temple'] }]."),
    FieldSpec::with_default("width", SIZE, DefaultValue::Num(1600.0), "Set the width of the map."),
    FieldSpec::with_default("height", SIZE, DefaultValue::Num(1000.0), "Set the height of the map."),
];
const PIE: &[FieldSpec] = &[
    records(&CATEGORY_VALUE_ITEM, "Slices such as [{ category: 'A', value: 27 }]."),
    FieldSpec::with_default("innerRadius", FieldKind::Number { min: Some(0.0), max: Some(1.0) }, DefaultValue::Num(0.0), "Set to a value such as 0.6 for a donut chart."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE,
];
const PIN_MAP: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::String, "Map title, at most 16 characters."),
    FieldSpec::required("data", STRING_LIST, "Points of interest, e.g. ['West Lake']."),
    FieldSpec::optional("markerPopup", FieldKind::Map, "Popup shown on each marker."),
    FieldSpec::with_default("width", SIZE, DefaultValue::Num(1600.0), "Set the width of the map."),
    FieldSpec::with_default("height", SIZE, DefaultValue::Num(1000.0), "Set the height of the map."),
];
const RADAR: &[FieldSpec] = &[
    records(&NAMED_VALUE_ITEM, "Dimensions such as [{ name: 'Design', value: 70 }]."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE,
];
const FLOW: &[FieldSpec] = &[
    FieldSpec::required("source", FieldKind::String, ""),
    FieldSpec::required("target", FieldKind::String, ""),
    FieldSpec::required("value", NUMBER, ""),
];
const SANKEY: &[FieldSpec] = &[
    records(&FLOW_ITEM, "Flows such as [{ source: 'A', target: 'B', value: 10 }]."),
    FieldSpec::with_default("nodeAlign", FieldKind::Enum(&["left", "right", "justify", "center"]), DefaultValue::Str("center"), ""),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE,
];
const POINT: &[FieldSpec] = &[
    FieldSpec::required("x", NUMBER, ""),
    FieldSpec::required("y", NUMBER, ""),
];
const SCATTER: &[FieldSpec] = &[
    records(&POINT_ITEM, "Points such as [{ x: 10, y: 15 }]."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE, AXIS_X_TITLE, AXIS_Y_TITLE,
];
const TREEMAP_NODE: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::String, ""),
    FieldSpec::required("value", NUMBER, ""),
    FieldSpec::optional("children", FieldKind::Array { item: &FieldKind::Any, min_items: 0 }, ""),
];
const TREEMAP: &[FieldSpec] = &[
    records(&TREEMAP_NODE_ITEM, "Nodes such as [{ name: 'Design', value: 70, children: [...] }]."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE,
];
const VENN_SET: &[FieldSpec] = &[
    FieldSpec::optional("label", FieldKind::String, ""),
    FieldSpec::required("value", NUMBER, ""),
    FieldSpec::required("sets", STRING_LIST, ""),
];
const VENN: &[FieldSpec] = &[
    records(&VENN_SET_ITEM, "Sets such as [{ sets: ['A', 'B'], value: 2 }]."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE,
];
const WORD: &[FieldSpec] = &[
    FieldSpec::required("text", FieldKind::String, ""),
    FieldSpec::required("value", NUMBER, ""),
];
const WORD_CLOUD: &[FieldSpec] = &[
    records(&WORD_ITEM, "Words such as [{ text: 'chart', value: 4 }]."),
    STYLE, THEME_FIELD, WIDTH, HEIGHT, TITLE,
];

static AREA_SCHEMA: ChartSchema = ChartSchema::new(AREA);
static BAR_SCHEMA: ChartSchema = ChartSchema::new(BAR);
static BOXPLOT_SCHEMA: ChartSchema = ChartSchema::new(CATEGORY_DISTRIBUTION);
static CANDLESTICK_SCHEMA: ChartSchema = ChartSchema::new(CANDLESTICK);
static COLUMN_SCHEMA: ChartSchema = ChartSchema::new(COLUMN);
static DISTRICT_MAP_SCHEMA: ChartSchema = ChartSchema::new(DISTRICT_MAP);
static DUAL_AXES_SCHEMA: ChartSchema = ChartSchema::new(DUAL_AXES);
static TREE_DIAGRAM_SCHEMA: ChartSchema = ChartSchema::new(TREE_DIAGRAM);
static GRAPH_DIAGRAM_SCHEMA: ChartSchema = ChartSchema::new(GRAPH_DIAGRAM);
static FUNNEL_SCHEMA: ChartSchema = ChartSchema::new(FUNNEL);
static HISTOGRAM_SCHEMA: ChartSchema = ChartSchema::new(HISTOGRAM);
static LINE_SCHEMA: ChartSchema = ChartSchema::new(LINE);
static LIQUID_SCHEMA: ChartSchema = ChartSchema::new(LIQUID);
static ORGANIZATION_SCHEMA: ChartSchema = ChartSchema::new(ORGANIZATION);
static PATH_MAP_SCHEMA: ChartSchema = ChartSchema::new(PATH_MAP);
static PIE_SCHEMA: ChartSchema = ChartSchema::new(PIE);
static PIN_MAP_SCHEMA: ChartSchema = ChartSchema::new(PIN_MAP);
static RADAR_SCHEMA: ChartSchema = ChartSchema::new(RADAR);
static SANKEY_SCHEMA: ChartSchema = ChartSchema::new(SANKEY);
static SCATTER_SCHEMA: ChartSchema = ChartSchema::new(SCATTER);
static TREEMAP_SCHEMA: ChartSchema = ChartSchema::new(TREEMAP);
static VENN_SCHEMA: ChartSchema = ChartSchema::new(VENN);
static WORD_CLOUD_SCHEMA: ChartSchema = ChartSchema::new(WORD_CLOUD);

pub(super) fn schema_for(kind: ChartKind) -> Option<&'static ChartSchema> {
    let schema = match kind {
        ChartKind::Area => &AREA_SCHEMA,
        ChartKind::Bar => &BAR_SCHEMA,
        ChartKind::Boxplot | ChartKind::Violin => &BOXPLOT_SCHEMA,
        ChartKind::Candlestick => &CANDLESTICK_SCHEMA,
        ChartKind::Column => &COLUMN_SCHEMA,
        ChartKind::DistrictMap => &DISTRICT_MAP_SCHEMA,
        ChartKind::DualAxes => &DUAL_AXES_SCHEMA,
        ChartKind::FishboneDiagram | ChartKind::MindMap => &TREE_DIAGRAM_SCHEMA,
        ChartKind::FlowDiagram | ChartKind::NetworkGraph => &GRAPH_DIAGRAM_SCHEMA,
        ChartKind::Funnel => &FUNNEL_SCHEMA,
        ChartKind::Histogram => &HISTOGRAM_SCHEMA,
        ChartKind::Line => &LINE_SCHEMA,
        ChartKind::Liquid => &LIQUID_SCHEMA,
        ChartKind::OrganizationChart => &ORGANIZATION_SCHEMA,
        ChartKind::PathMap => &PATH_MAP_SCHEMA,
        ChartKind::Pie => &PIE_SCHEMA,
        ChartKind::PinMap => &PIN_MAP_SCHEMA,
        ChartKind::Radar => &RADAR_SCHEMA,
        ChartKind::Sankey => &SANKEY_SCHEMA,
        ChartKind::Scatter => &SCATTER_SCHEMA,
        ChartKind::Treemap => &TREEMAP_SCHEMA,
        ChartKind::Venn => &VENN_SCHEMA,
        ChartKind::WordCloud => &WORD_CLOUD_SCHEMA,
    };
    Some(schema)
}
