use chainscope::kpi;
use chainscope::parser::parse_csv_str;
use chainscope::report::render;
use chainscope::{Dataset, Role};

fn ds(role: Role, text: &str) -> Dataset {
    parse_csv_str(role, text).unwrap()
}

fn empty(role: Role) -> Dataset {
    ds(role, "")
}

const INBOUND: &str = "\
Late,Vendor Name,Units,Transit_Mode,Reason_Code
No,Acme,100,Ocean,
Yes,Acme,50,Air,Port_Congestion
No,Beta,1200,Ocean,
Yes,Gamma,30,Ocean,Weather_Delay
Yes,Delta,20,Air,Port_Congestion
";

const OUTBOUND: &str = "\
Units_Ordered,Units_Invoiced,Channel,Avg_Price,Margin_Pct
1000,900,Retail,50,0.4
500,500,Wholesale,2000,0.2
200,100,Retail,120,0.6
";

const INVENTORY: &str = "\
Product Group,Division
Shoes,Footwear
Bags,Accessories
Bags,Accessories
Apparel,RTW
Shoes,Footwear
Bags,Accessories
Shoes,Footwear
Jewelry
";

const EXPECTED: &str = "\
=== COMPREHENSIVE SUPPLY CHAIN KPI SUMMARY ===

📦 INBOUND LOGISTICS (Vendor Performance)
==================================================
Total Inbound Orders: 5
On-Time Delivery Rate: 40.00%
Late Deliveries: 3 (60.00%)

Top 3 Vendors by On-Time Performance:
  1. Beta: 100.0% (1/1 orders, 1,200 units)
  2. Acme: 50.0% (1/2 orders, 150 units)
  3. Gamma: 0.0% (0/1 orders, 30 units)

Transit Mode Performance:
  - Ocean: 66.7% on-time (2/3)
  - Air: 0.0% on-time (0/2)

Top 3 Delay Reasons:
  1. Port Congestion: 2 orders (40.0%)
  2. Weather Delay: 1 orders (20.0%)


🚚 OUTBOUND FULFILLMENT (Customer Orders)
==================================================
Total Orders: 3
Units Ordered: 1,700
Units Invoiced: 1,500
Fulfillment Rate: 88.24%

Channel Breakdown:
  - Wholesale: 1 orders, 500 units, $1.00M revenue, 20.0% avg margin
  - Retail: 2 orders, 1,000 units, $0.06M revenue, 50.0% avg margin


📊 INVENTORY & PRODUCT CATALOG
==================================================
Total SKUs: 8

Product Group Distribution:
  - Shoes: 3 SKUs (37.5%)
  - Bags: 3 SKUs (37.5%)
  - Apparel: 1 SKUs (12.5%)
  - Jewelry: 1 SKUs (12.5%)

Division Split:
  - Footwear: 3 SKUs (37.5%)
  - Accessories: 3 SKUs (37.5%)
  - RTW: 1 SKUs (12.5%)


🔗 INTEGRATED INSIGHTS
==================================================
Total Revenue: $1.06M
Weighted Avg Margin: 34.67%
Inbound Units Received: 1,400
Outbound Units Shipped: 1,500
Inventory Turnover Indicator: 107.1%
";

#[test]
fn full_report_matches_snapshot() {
    let summary = kpi::compute(
        &ds(Role::Inbound, INBOUND),
        &ds(Role::Outbound, OUTBOUND),
        &ds(Role::Inventory, INVENTORY),
    );
    let report = render(&summary);
    assert_eq!(report, EXPECTED);
}

#[test]
fn two_row_inbound_scenario() {
    let inbound = ds(Role::Inbound, "Late,Vendor Name,Units\nNo,A,10\nYes,B,5\n");
    let summary = kpi::compute(&inbound, &empty(Role::Outbound), &empty(Role::Inventory));
    let report = render(&summary);
    assert!(report.contains("Total Inbound Orders: 2\n"));
    assert!(report.contains("On-Time Delivery Rate: 50.00%\n"));
    assert!(report.contains("Late Deliveries: 1 (50.00%)\n"));
    assert!(report.contains("  1. A: 100.0% (1/1 orders, 10 units)\n"));
    assert!(report.contains("  2. B: 0.0% (0/1 orders, 5 units)\n"));
    assert!(report.contains("Inbound Units Received: 15\n"));
}

#[test]
fn single_row_outbound_scenario() {
    let outbound = ds(
        Role::Outbound,
        "Units_Ordered,Units_Invoiced,Channel,Avg_Price,Margin_Pct\n100,80,Retail,10,0.3\n",
    );
    let summary = kpi::compute(&empty(Role::Inbound), &outbound, &empty(Role::Inventory));
    let report = render(&summary);
    assert!(report.contains("Fulfillment Rate: 80.00%\n"));
    assert!(report.contains("  - Retail: 1 orders, 80 units, $0.00M revenue, 30.0% avg margin\n"));
    assert!(report.contains("Total Revenue: $0.00M\n"));
    assert!(report.contains("Weighted Avg Margin: 30.00%\n"));
}

#[test]
fn zero_denominators_render_not_available() {
    let summary = kpi::compute(&empty(Role::Inbound), &empty(Role::Outbound), &empty(Role::Inventory));
    let report = render(&summary);
    assert!(report.contains("On-Time Delivery Rate: N/A\n"));
    assert!(report.contains("Late Deliveries: 0 (N/A)\n"));
    assert!(report.contains("Fulfillment Rate: N/A\n"));
    assert!(report.contains("Weighted Avg Margin: N/A\n"));
    assert!(report.contains("Inventory Turnover Indicator: N/A\n"));
    assert!(report.contains("Total SKUs: 0\n"));
    assert!(!report.contains("NaN"));
    assert!(!report.contains("Infinity"));
}

#[test]
fn sections_appear_in_fixed_order() {
    let summary = kpi::compute(&empty(Role::Inbound), &empty(Role::Outbound), &empty(Role::Inventory));
    let report = render(&summary);
    let markers = [
        "=== COMPREHENSIVE SUPPLY CHAIN KPI SUMMARY ===",
        "📦 INBOUND LOGISTICS",
        "Top 3 Vendors by On-Time Performance:",
        "Transit Mode Performance:",
        "Top 3 Delay Reasons:",
        "🚚 OUTBOUND FULFILLMENT",
        "Channel Breakdown:",
        "📊 INVENTORY & PRODUCT CATALOG",
        "Product Group Distribution:",
        "Division Split:",
        "🔗 INTEGRATED INSIGHTS",
        "Inventory Turnover Indicator:",
    ];
    let positions: Vec<usize> = markers.iter().map(|m| report.find(m).expect(m)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(report.ends_with('\n') && !report.ends_with("\n\n"));
}

#[test]
fn large_unit_counts_are_grouped() {
    let inbound = ds(Role::Inbound, "Late,Vendor Name,Units\nNo,Acme,1234567\n");
    let summary = kpi::compute(&inbound, &empty(Role::Outbound), &empty(Role::Inventory));
    let report = render(&summary);
    assert!(report.contains("(1/1 orders, 1,234,567 units)"));
    assert!(report.contains("Inbound Units Received: 1,234,567\n"));
}
