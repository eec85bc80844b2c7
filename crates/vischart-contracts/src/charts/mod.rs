mod catalog;
mod schemas;

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::ChartSchema;

pub use catalog::{list_tools, ToolDescriptor};

/// Tool name of the entry point that takes the chart type as a `type` argument.
pub const UNIFIED_TOOL_NAME: &str = "generate_chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartKind {
    Area,
    Bar,
    Boxplot,
    Candlestick,
    Column,
    DistrictMap,
    DualAxes,
    FishboneDiagram,
    FlowDiagram,
    Funnel,
    Histogram,
    Line,
    Liquid,
    MindMap,
    NetworkGraph,
    OrganizationChart,
    PathMap,
    Pie,
    PinMap,
    Radar,
    Sankey,
    Scatter,
    Treemap,
    Venn,
    Violin,
    WordCloud,
}

/// How a chart kind is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    RemoteChart,
    LocalRender,
    Map,
}

impl ChartKind {
    pub const ALL: [ChartKind; 26] = [
        Self::Area,
        Self::Bar,
        Self::Boxplot,
        Self::Candlestick,
        Self::Column,
        Self::DistrictMap,
        Self::DualAxes,
        Self::FishboneDiagram,
        Self::FlowDiagram,
        Self::Funnel,
        Self::Histogram,
        Self::Line,
        Self::Liquid,
        Self::MindMap,
        Self::NetworkGraph,
        Self::OrganizationChart,
        Self::PathMap,
        Self::Pie,
        Self::PinMap,
        Self::Radar,
        Self::Sankey,
        Self::Scatter,
        Self::Treemap,
        Self::Venn,
        Self::Violin,
        Self::WordCloud,
    ];

    /// Canonical chart-type identifier, as accepted by the `type` argument.
    pub fn id(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Bar => "bar",
            Self::Boxplot => "boxplot",
            Self::Candlestick => "candlestick",
            Self::Column => "column",
            Self::DistrictMap => "district-map",
            Self::DualAxes => "dual-axes",
            Self::FishboneDiagram => "fishbone-diagram",
            Self::FlowDiagram => "flow-diagram",
            Self::Funnel => "funnel",
            Self::Histogram => "histogram",
            Self::Line => "line",
            Self::Liquid => "liquid",
            Self::MindMap => "mind-map",
            Self::NetworkGraph => "network-graph",
            Self::OrganizationChart => "organization-chart",
            Self::PathMap => "path-map",
            Self::Pie => "pie",
            Self::PinMap => "pin-map",
            Self::Radar => "radar",
            Self::Sankey => "sankey",
            Self::Scatter => "scatter",
            Self::Treemap => "treemap",
            Self::Venn => "venn",
            Self::Violin => "violin",
            Self::WordCloud => "word-cloud",
        }
    }

    pub fn tool_name(self) -> &'static str {
        match self {
            Self::Area => "generate_area_chart",
            Self::Bar => "generate_bar_chart",
            Self::Boxplot => "generate_boxplot_chart",
            Self::Candlestick => "generate_candlestick_chart",
            Self::Column => "generate_column_chart",
            Self::DistrictMap => "generate_district_map",
            Self::DualAxes => "generate_dual_axes_chart",
            Self::FishboneDiagram => "generate_fishbone_diagram",
            Self::FlowDiagram => "generate_flow_diagram",
            Self::Funnel => "generate_funnel_chart",
            Self::Histogram => "generate_histogram_chart",
            Self::Line => "generate_line_chart",
            Self::Liquid => "generate_liquid_chart",
            Self::MindMap => "generate_mind_map",
            Self::NetworkGraph => "generate_network_graph",
            Self::OrganizationChart => "generate_organization_chart",
            Self::PathMap => "generate_path_map",
            Self::Pie => "generate_pie_chart",
            Self::PinMap => "generate_pin_map",
            Self::Radar => "generate_radar_chart",
            Self::Sankey => "generate_sankey_chart",
            Self::Scatter => "generate_scatter_chart",
            Self::Treemap => "generate_treemap_chart",
            Self::Venn => "generate_venn_chart",
            Self::Violin => "generate_violin_chart",
            Self::WordCloud => "generate_word_cloud_chart",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Area => "Generate an area chart showing how a quantity accumulates over a continuous independent variable, such as a trend over time.",
            Self::Bar => "Generate a horizontal bar chart comparing values across categories.",
            Self::Boxplot => "Generate a boxplot showing the distribution of values per category: median, quartiles and outliers.",
            Self::Candlestick => "Generate a candlestick (stock) chart from open/high/low/close records, such as daily price movement of a security.",
            Self::Column => "Generate a column chart comparing values across categories, optionally grouped or stacked.",
            Self::DistrictMap => "Generate an administrative district map for a region within China, with optional subdistrict coloring.",
            Self::DualAxes => "Generate a dual axes chart combining column and line series that share a category axis.",
            Self::FishboneDiagram => "Generate a fishbone diagram showing the causes behind a problem.",
            Self::FlowDiagram => "Generate a flow diagram showing the steps and decision points of a process.",
            Self::Funnel => "Generate a funnel chart showing the drop-off between stages of a process.",
            Self::Histogram => "Generate a histogram showing the frequency distribution of numeric values.",
            Self::Line => "Generate a line chart showing a trend over time.",
            Self::Liquid => "Generate a liquid chart showing a single percentage as a filled shape.",
            Self::MindMap => "Generate a mind map organizing topics hierarchically around a central idea.",
            Self::NetworkGraph => "Generate a network graph showing relationships between entities.",
            Self::OrganizationChart => "Generate an organization chart showing reporting structure.",
            Self::PathMap => "Generate a route map connecting points of interest within China.",
            Self::Pie => "Generate a pie chart showing the share of each part in a whole.",
            Self::PinMap => "Generate a point map marking points of interest within China.",
            Self::Radar => "Generate a radar chart comparing values across several dimensions.",
            Self::Sankey => "Generate a sankey chart showing flows between nodes.",
            Self::Scatter => "Generate a scatter chart showing the relationship between two variables.",
            Self::Treemap => "Generate a treemap showing hierarchical data as nested rectangles.",
            Self::Venn => "Generate a venn diagram showing overlaps between sets.",
            Self::Violin => "Generate a violin chart showing the distribution density of values per category.",
            Self::WordCloud => "Generate a word cloud sized by word weight.",
        }
    }

    pub fn schema(self) -> Option<&'static ChartSchema> {
        schemas::schema_for(self)
    }

    pub fn strategy(self) -> StrategyKind {
        match self {
            Self::Candlestick => StrategyKind::LocalRender,
            Self::DistrictMap | Self::PathMap | Self::PinMap => StrategyKind::Map,
            _ => StrategyKind::RemoteChart,
        }
    }

    /// Tool name expected by the map service: `generate_` plus the id with
    /// hyphens replaced by underscores.
    pub fn map_tool_name(self) -> String {
        format!("generate_{}", self.id().replace('-', "_"))
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn from_tool_name(tool_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tool_name() == tool_name)
    }

    pub fn supported_ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.id()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("type parameter required when calling generate_chart")]
    MissingType,
    #[error("Unsupported chart type: {requested}. Supported types: {supported}")]
    UnsupportedType { requested: String, supported: String },
}

/// Tool names excluded from listing and dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledTools {
    names: BTreeSet<String>,
}

impl DisabledTools {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// Parses a comma separated list such as `generate_pie_chart, generate_pin_map`.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.names.contains(tool_name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub fn resolve_chart_kind(
    tool_name: &str,
    arguments: &Map<String, Value>,
    disabled: &DisabledTools,
) -> Result<ChartKind, ResolveError> {
    if disabled.contains(tool_name) {
        return Err(ResolveError::UnknownTool(tool_name.to_string()));
    }
    if tool_name == UNIFIED_TOOL_NAME {
        let requested = match arguments.get("type") {
            None | Some(Value::Null) => return Err(ResolveError::MissingType),
            Some(Value::String(text)) if text.trim().is_empty() => {
                return Err(ResolveError::MissingType)
            }
            Some(Value::String(text)) => text.trim().to_string(),
            Some(other) => other.to_string(),
        };
        return ChartKind::from_id(&requested).ok_or_else(|| ResolveError::UnsupportedType {
            requested,
            supported: ChartKind::supported_ids().join(", "),
        });
    }
    ChartKind::from_tool_name(tool_name)
        .ok_or_else(|| ResolveError::UnknownTool(tool_name.to_string()))
}
