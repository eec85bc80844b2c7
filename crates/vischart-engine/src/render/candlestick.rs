use std::io::Cursor;

use anyhow::{anyhow, bail, Context, Result};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ChartRenderer, EmbeddedImage, RenderSpec};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct OhlcRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Palette {
    background: RGBColor,
    axis: RGBColor,
    rising: RGBColor,
    falling: RGBColor,
}

impl Palette {
    fn resolve(theme: &str, style: &Map<String, Value>) -> Self {
        let mut palette = if theme.eq_ignore_ascii_case("dark") {
            Self {
                background: RGBColor(20, 20, 20),
                axis: RGBColor(190, 190, 190),
                rising: RGBColor(38, 166, 154),
                falling: RGBColor(239, 83, 80),
            }
        } else {
            Self {
                background: RGBColor(255, 255, 255),
                axis: RGBColor(64, 64, 64),
                rising: RGBColor(38, 166, 154),
                falling: RGBColor(239, 83, 80),
            }
        };
        if let Some(color) = style
            .get("backgroundColor")
            .and_then(Value::as_str)
            .and_then(parse_hex_color)
        {
            palette.background = color;
        }
        let custom: Vec<RGBColor> = style
            .get("palette")
            .and_then(Value::as_array)
            .map(|colors| {
                colors
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(parse_hex_color)
                    .collect()
            })
            .unwrap_or_default();
        if let Some(rising) = custom.first() {
            palette.rising = *rising;
        }
        if let Some(falling) = custom.get(1) {
            palette.falling = *falling;
        }
        palette
    }
}

/// In-process candlestick renderer: draws OHLC records to an RGB buffer and
/// encodes it as PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandlestickRenderer;

impl ChartRenderer for CandlestickRenderer {
    fn render(&self, spec: &RenderSpec) -> Result<EmbeddedImage> {
        let records = parse_records(&spec.data)?;
        let (low, high) = price_bounds(&records)?;
        let palette = Palette::resolve(&spec.theme, &spec.style);
        let (width, height) = (spec.width, spec.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&palette.background)
                .map_err(|err| anyhow!("failed to fill chart background: {err}"))?;

            // plotters is built without a font backend: nothing here may draw text.
            let last_index = records.len() as f64 - 0.5;
            let mut chart = ChartBuilder::on(&root)
                .margin(chart_margin(width, height))
                .build_cartesian_2d(-0.5f64..last_index, low..high)
                .map_err(|err| anyhow!("failed to build chart coordinates: {err}"))?;

            let grid_style = palette.axis.mix(0.25).stroke_width(1);
            chart
                .draw_series(grid_levels(low, high).into_iter().map(|level| {
                    PathElement::new(vec![(-0.5, level), (last_index, level)], grid_style)
                }))
                .map_err(|err| anyhow!("failed to draw grid: {err}"))?;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(-0.5, high), (-0.5, low), (last_index, low)],
                    palette.axis.stroke_width(1),
                )))
                .map_err(|err| anyhow!("failed to draw axes: {err}"))?;

            let candle_width = candle_width(width, records.len());
            chart
                .draw_series(records.iter().enumerate().map(|(idx, record)| {
                    CandleStick::new(
                        idx as f64,
                        record.open,
                        record.high,
                        record.low,
                        record.close,
                        palette.rising.filled(),
                        palette.falling.filled(),
                        candle_width,
                    )
                }))
                .map_err(|err| anyhow!("failed to draw candles: {err}"))?;

            root.present()
                .map_err(|err| anyhow!("failed to finish chart drawing: {err}"))?;
        }
        encode_png(width, height, buffer)
    }
}

fn parse_records(data: &Value) -> Result<Vec<OhlcRecord>> {
    if !data.is_array() {
        bail!("candlestick data must be a list of OHLC records");
    }
    let records: Vec<OhlcRecord> = serde_json::from_value(data.clone())
        .context("candlestick data must contain date/open/high/low/close records")?;
    if records.is_empty() {
        bail!("candlestick data is empty");
    }
    for (idx, record) in records.iter().enumerate() {
        let prices = [record.open, record.high, record.low, record.close];
        if prices.iter().any(|price| !price.is_finite()) {
            bail!("record {idx} ({}) has a non-finite price", record.date);
        }
        if record.high < record.low {
            bail!("record {idx} ({}) has high below low", record.date);
        }
    }
    Ok(records)
}

fn price_bounds(records: &[OhlcRecord]) -> Result<(f64, f64)> {
    let low = records
        .iter()
        .map(|record| record.low.min(record.open).min(record.close))
        .fold(f64::INFINITY, f64::min);
    let high = records
        .iter()
        .map(|record| record.high.max(record.open).max(record.close))
        .fold(f64::NEG_INFINITY, f64::max);
    let span = high - low;
    if !span.is_finite() {
        bail!("price range {low}..{high} is too wide to plot");
    }
    let padding = (span * 0.05).max(high.abs() * 0.01).max(0.01);
    let (low, high) = (low - padding, high + padding);
    if !low.is_finite() || !high.is_finite() || !(high - low).is_finite() {
        bail!("price range {low}..{high} is too wide to plot");
    }
    Ok((low, high))
}

/// Five evenly spaced horizontal levels inside the price range.
fn grid_levels(low: f64, high: f64) -> Vec<f64> {
    let step = (high - low) / 6.0;
    (1..=5).map(|idx| low + step * idx as f64).collect()
}

fn chart_margin(width: u32, height: u32) -> u32 {
    (width.min(height) / 40).min(16)
}

fn candle_width(chart_width: u32, count: usize) -> u32 {
    let slot = chart_width as f64 / count.max(1) as f64;
    (slot * 0.6).clamp(1.0, 40.0) as u32
}

fn parse_hex_color(raw: &str) -> Option<RGBColor> {
    let hex = raw.trim().strip_prefix('#')?;
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |idx: usize| u8::from_str_radix(expanded.get(idx..idx + 2)?, 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

fn encode_png(width: u32, height: u32, buffer: Vec<u8>) -> Result<EmbeddedImage> {
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| anyhow!("render buffer does not match {width}x{height}"))?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("failed to encode chart as PNG")?;
    Ok(EmbeddedImage::new("image/png", bytes))
}
