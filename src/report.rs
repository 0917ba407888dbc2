use crate::format::{thousands, to_fixed};
use crate::kpi::{InboundKpis, IntegratedKpis, InventoryKpis, KpiSummary, OutboundKpis, TOP_DELAY_REASONS, TOP_VENDORS};
use std::fmt::Write;

pub const TITLE: &str = "=== COMPREHENSIVE SUPPLY CHAIN KPI SUMMARY ===";
pub const INBOUND_HEADER: &str = "📦 INBOUND LOGISTICS (Vendor Performance)";
pub const OUTBOUND_HEADER: &str = "🚚 OUTBOUND FULFILLMENT (Customer Orders)";
pub const INVENTORY_HEADER: &str = "📊 INVENTORY & PRODUCT CATALOG";
pub const INTEGRATED_HEADER: &str = "🔗 INTEGRATED INSIGHTS";

const RULE_WIDTH: usize = 50;
const NOT_AVAILABLE: &str = "N/A";

/// Renders the KPI report text. Section order and number formats are fixed.
pub fn render(summary: &KpiSummary) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(TITLE);
    out.push_str("\n\n");
    write_inbound(&mut out, &summary.inbound);
    out.push_str("\n\n");
    write_outbound(&mut out, &summary.outbound);
    out.push_str("\n\n");
    write_inventory(&mut out, &summary.inventory);
    out.push_str("\n\n");
    write_integrated(&mut out, &summary.integrated);
    out
}

fn section(out: &mut String, header: &str) {
    out.push_str(header);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
}

// "12.34%" or "N/A"
fn pct(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) => format!("{}%", to_fixed(v, digits)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn write_inbound(out: &mut String, k: &InboundKpis) {
    section(out, INBOUND_HEADER);
    let _ = writeln!(out, "Total Inbound Orders: {}", k.total_orders);
    let _ = writeln!(out, "On-Time Delivery Rate: {}", pct(k.on_time_rate, 2));
    let _ = writeln!(out, "Late Deliveries: {} ({})", k.late, pct(k.late_rate, 2));
    out.push('\n');

    let _ = writeln!(out, "Top {TOP_VENDORS} Vendors by On-Time Performance:");
    for (idx, v) in k.top_vendors.iter().enumerate() {
        let Some(rate) = v.on_time_rate() else { continue };
        let _ = writeln!(
            out,
            "  {}. {}: {}% ({}/{} orders, {} units)",
            idx + 1,
            v.vendor,
            to_fixed(rate * 100.0, 1),
            v.on_time,
            v.total,
            thousands(v.units)
        );
    }

    out.push_str("\nTransit Mode Performance:\n");
    for m in &k.transit_modes {
        let Some(rate) = m.on_time_rate() else { continue };
        let _ = writeln!(
            out,
            "  - {}: {}% on-time ({}/{})",
            m.mode,
            to_fixed(rate * 100.0, 1),
            m.on_time,
            m.total
        );
    }

    let _ = writeln!(out, "\nTop {TOP_DELAY_REASONS} Delay Reasons:");
    for (idx, r) in k.top_delay_reasons.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}: {} orders ({}%)",
            idx + 1,
            r.label(),
            r.count,
            to_fixed(r.pct_of_orders, 1)
        );
    }
}

fn write_outbound(out: &mut String, k: &OutboundKpis) {
    section(out, OUTBOUND_HEADER);
    let _ = writeln!(out, "Total Orders: {}", k.total_orders);
    let _ = writeln!(out, "Units Ordered: {}", thousands(k.units_ordered));
    let _ = writeln!(out, "Units Invoiced: {}", thousands(k.units_invoiced));
    let _ = writeln!(out, "Fulfillment Rate: {}", pct(k.fulfillment_rate, 2));
    out.push('\n');

    out.push_str("Channel Breakdown:\n");
    for c in &k.channels {
        let _ = writeln!(
            out,
            "  - {}: {} orders, {} units, ${}M revenue, {}% avg margin",
            c.channel,
            c.orders,
            thousands(c.units),
            to_fixed(c.revenue / 1_000_000.0, 2),
            to_fixed(c.avg_margin * 100.0, 1)
        );
    }
}

fn write_inventory(out: &mut String, k: &InventoryKpis) {
    section(out, INVENTORY_HEADER);
    let _ = writeln!(out, "Total SKUs: {}", k.total_skus);
    out.push('\n');

    out.push_str("Product Group Distribution:\n");
    for g in &k.product_groups {
        let _ = writeln!(out, "  - {}: {} SKUs ({}%)", g.name, g.count, to_fixed(g.pct, 1));
    }

    out.push_str("\nDivision Split:\n");
    for d in &k.divisions {
        let _ = writeln!(out, "  - {}: {} SKUs ({}%)", d.name, d.count, to_fixed(d.pct, 1));
    }
}

fn write_integrated(out: &mut String, k: &IntegratedKpis) {
    section(out, INTEGRATED_HEADER);
    let _ = writeln!(out, "Total Revenue: ${}M", to_fixed(k.total_revenue / 1_000_000.0, 2));
    let _ = writeln!(
        out,
        "Weighted Avg Margin: {}",
        pct(k.weighted_avg_margin.map(|m| m * 100.0), 2)
    );
    let _ = writeln!(out, "Inbound Units Received: {}", thousands(k.inbound_units_received));
    let _ = writeln!(out, "Outbound Units Shipped: {}", thousands(k.outbound_units_shipped));
    let _ = writeln!(out, "Inventory Turnover Indicator: {}", pct(k.turnover_pct, 1));
}
