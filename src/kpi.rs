//! KPI aggregation over the three supply-chain datasets.
//!
//! Every function here is a pure fold over its input records. Nothing is
//! cached between calls; callers recompute from scratch whenever a dataset
//! changes.

use crate::format::{percent, to_fixed};
use crate::grouping::{rank_desc, OrderedGroups};
use crate::parser::Dataset;
use crate::schema::{InboundRow, InventoryRow, OutboundRow};
use crate::state::Datasets;
use serde::{Deserialize, Serialize};

pub const TOP_VENDORS: usize = 3;
pub const TOP_DELAY_REASONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub inbound: InboundKpis,
    pub outbound: OutboundKpis,
    pub inventory: InventoryKpis,
    pub integrated: IntegratedKpis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundKpis {
    pub total_orders: usize,
    pub on_time: usize,
    pub late: usize,
    /// None when there are no inbound orders.
    pub on_time_rate: Option<f64>,
    /// Complement of the on-time rate after it was rounded to two decimals.
    pub late_rate: Option<f64>,
    pub top_vendors: Vec<VendorStat>,
    pub transit_modes: Vec<TransitStat>,
    pub top_delay_reasons: Vec<ReasonCount>,
    pub units_received: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorStat {
    pub vendor: String,
    pub total: usize,
    pub on_time: usize,
    pub units: i64,
}

impl VendorStat {
    pub fn on_time_rate(&self) -> Option<f64> {
        ratio(self.on_time, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitStat {
    pub mode: String,
    pub total: usize,
    pub on_time: usize,
}

impl TransitStat {
    pub fn on_time_rate(&self) -> Option<f64> {
        ratio(self.on_time, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: usize,
    /// Share of all inbound orders, not only the delayed ones.
    pub pct_of_orders: f64,
}

impl ReasonCount {
    pub fn label(&self) -> String {
        self.reason.replace('_', " ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundKpis {
    pub total_orders: usize,
    pub units_ordered: i64,
    pub units_invoiced: i64,
    /// None when no units were ordered.
    pub fulfillment_rate: Option<f64>,
    pub channels: Vec<ChannelStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStat {
    pub channel: String,
    pub orders: usize,
    pub units: i64,
    pub revenue: f64,
    /// Unweighted mean of Margin_Pct over the channel's order lines.
    pub avg_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryKpis {
    pub total_skus: usize,
    /// Ranked by count, largest first.
    pub product_groups: Vec<GroupCount>,
    /// First-seen order.
    pub divisions: Vec<GroupCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
    pub name: String,
    pub count: usize,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedKpis {
    pub total_revenue: f64,
    /// Margin weighted by invoiced units; None when nothing was invoiced.
    pub weighted_avg_margin: Option<f64>,
    pub inbound_units_received: i64,
    pub outbound_units_shipped: i64,
    /// Shipped / received as a percentage; None when nothing was received.
    pub turnover_pct: Option<f64>,
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    if den == 0 { None } else { Some(num as f64 / den as f64) }
}

/// Full summary, or None until all three datasets are loaded.
pub fn summarize(datasets: &Datasets) -> Option<KpiSummary> {
    let (inbound, outbound, inventory) = datasets.all()?;
    Some(compute(inbound, outbound, inventory))
}

pub fn compute(inbound: &Dataset, outbound: &Dataset, inventory: &Dataset) -> KpiSummary {
    tracing::debug!(
        inbound = inbound.len(),
        outbound = outbound.len(),
        inventory = inventory.len(),
        "computing kpi summary"
    );
    let inbound_kpis = inbound_kpis(inbound);
    let outbound_kpis = outbound_kpis(outbound);
    KpiSummary {
        integrated: integrated_kpis(inbound, outbound),
        inbound: inbound_kpis,
        outbound: outbound_kpis,
        inventory: inventory_kpis(inventory),
    }
}

#[derive(Default)]
struct DeliveryAcc {
    total: usize,
    on_time: usize,
    units: i64,
}

pub fn inbound_kpis(inbound: &Dataset) -> InboundKpis {
    let rows: Vec<InboundRow> = inbound.records().iter().map(InboundRow::from_record).collect();
    let total_orders = rows.len();
    let on_time = rows.iter().filter(|r| r.on_time()).count();

    let on_time_rate = percent(on_time as f64, total_orders as f64);
    let late_rate = on_time_rate.map(|r| 100.0 - rounded(r, 2));

    let mut vendors: OrderedGroups<DeliveryAcc> = OrderedGroups::new();
    let mut modes: OrderedGroups<DeliveryAcc> = OrderedGroups::new();
    let mut reasons: OrderedGroups<usize> = OrderedGroups::new();
    let mut units_received = 0i64;

    for row in &rows {
        let units = row.units();
        units_received = units_received.saturating_add(units);
        if let Some(vendor) = row.vendor {
            let acc = vendors.entry(vendor);
            acc.total += 1;
            acc.on_time += usize::from(row.on_time());
            acc.units = acc.units.saturating_add(units);
        }
        if let Some(mode) = row.transit_mode {
            let acc = modes.entry(mode);
            acc.total += 1;
            acc.on_time += usize::from(row.on_time());
        }
        if let Some(reason) = row.reason_code {
            *reasons.entry(reason) += 1;
        }
    }

    let vendor_stats: Vec<VendorStat> = vendors
        .into_vec()
        .into_iter()
        .map(|(vendor, acc)| VendorStat { vendor, total: acc.total, on_time: acc.on_time, units: acc.units })
        .filter(|v| v.total > 0)
        .collect();
    let mut top_vendors = rank_desc(vendor_stats, |v| v.on_time_rate().unwrap_or(0.0));
    top_vendors.truncate(TOP_VENDORS);

    let transit_modes = modes
        .into_vec()
        .into_iter()
        .map(|(mode, acc)| TransitStat { mode, total: acc.total, on_time: acc.on_time })
        .collect();

    let reason_counts: Vec<ReasonCount> = reasons
        .into_vec()
        .into_iter()
        .map(|(reason, count)| ReasonCount {
            reason,
            count,
            pct_of_orders: percent(count as f64, total_orders as f64).unwrap_or(0.0),
        })
        .collect();
    let mut top_delay_reasons = rank_desc(reason_counts, |r| r.count);
    top_delay_reasons.truncate(TOP_DELAY_REASONS);

    InboundKpis {
        total_orders,
        on_time,
        late: total_orders - on_time,
        on_time_rate,
        late_rate,
        top_vendors,
        transit_modes,
        top_delay_reasons,
        units_received,
    }
}

#[derive(Default)]
struct ChannelAcc {
    orders: usize,
    units: i64,
    revenue: f64,
    margin_sum: f64,
}

pub fn outbound_kpis(outbound: &Dataset) -> OutboundKpis {
    let rows: Vec<OutboundRow> = outbound.records().iter().map(OutboundRow::from_record).collect();
    let units_ordered = rows.iter().fold(0i64, |s, r| s.saturating_add(r.units_ordered()));
    let units_invoiced = rows.iter().fold(0i64, |s, r| s.saturating_add(r.units_invoiced()));

    let mut channels: OrderedGroups<ChannelAcc> = OrderedGroups::new();
    for row in &rows {
        if let Some(channel) = row.channel {
            let acc = channels.entry(channel);
            acc.orders += 1;
            acc.units = acc.units.saturating_add(row.units_invoiced());
            acc.revenue += row.revenue();
            acc.margin_sum += row.margin();
        }
    }

    let channel_stats: Vec<ChannelStat> = channels
        .into_vec()
        .into_iter()
        .map(|(channel, acc)| ChannelStat {
            channel,
            orders: acc.orders,
            units: acc.units,
            revenue: acc.revenue,
            avg_margin: acc.margin_sum / acc.orders.max(1) as f64,
        })
        .collect();

    OutboundKpis {
        total_orders: rows.len(),
        units_ordered,
        units_invoiced,
        fulfillment_rate: percent(units_invoiced as f64, units_ordered as f64),
        channels: rank_desc(channel_stats, |c| c.revenue),
    }
}

pub fn inventory_kpis(inventory: &Dataset) -> InventoryKpis {
    let total_skus = inventory.len();
    let mut groups: OrderedGroups<usize> = OrderedGroups::new();
    let mut divisions: OrderedGroups<usize> = OrderedGroups::new();

    for row in inventory.records().iter().map(InventoryRow::from_record) {
        if let Some(group) = row.product_group {
            *groups.entry(group) += 1;
        }
        if let Some(division) = row.division {
            *divisions.entry(division) += 1;
        }
    }

    let to_counts = |g: OrderedGroups<usize>| -> Vec<GroupCount> {
        g.into_vec()
            .into_iter()
            .map(|(name, count)| GroupCount {
                name,
                count,
                pct: percent(count as f64, total_skus as f64).unwrap_or(0.0),
            })
            .collect()
    };

    InventoryKpis {
        total_skus,
        product_groups: rank_desc(to_counts(groups), |g| g.count),
        divisions: to_counts(divisions),
    }
}

pub fn integrated_kpis(inbound: &Dataset, outbound: &Dataset) -> IntegratedKpis {
    let out_rows: Vec<OutboundRow> = outbound.records().iter().map(OutboundRow::from_record).collect();

    // every order line counts here, including those without a channel
    let total_revenue: f64 = out_rows.iter().map(|r| r.revenue()).sum();
    let units_shipped = out_rows.iter().fold(0i64, |s, r| s.saturating_add(r.units_invoiced()));
    let margin_units: f64 = out_rows.iter().map(|r| r.margin() * r.units_invoiced() as f64).sum();
    let weighted_avg_margin = if units_shipped == 0 {
        None
    } else {
        Some(margin_units / units_shipped as f64)
    };

    let units_received = inbound
        .records()
        .iter()
        .map(InboundRow::from_record)
        .fold(0i64, |s, r| s.saturating_add(r.units()));

    IntegratedKpis {
        total_revenue,
        weighted_avg_margin,
        inbound_units_received: units_received,
        outbound_units_shipped: units_shipped,
        turnover_pct: percent(units_shipped as f64, units_received as f64),
    }
}

/// The value `to_fixed` would print, read back as a number.
fn rounded(x: f64, digits: usize) -> f64 {
    to_fixed(x, digits).parse().unwrap_or(x)
}
