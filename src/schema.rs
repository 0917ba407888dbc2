use crate::coerce;
use crate::parser::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Inbound,
    Outbound,
    Inventory,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Inbound, Role::Outbound, Role::Inventory];

    /// Columns the aggregator reads for this role. Absent columns degrade, they do not fail.
    pub fn expected_columns(self) -> &'static [&'static str] {
        match self {
            Role::Inbound => &[LATE, VENDOR_NAME, UNITS, TRANSIT_MODE, REASON_CODE],
            Role::Outbound => &[UNITS_ORDERED, UNITS_INVOICED, CHANNEL, AVG_PRICE, MARGIN_PCT],
            Role::Inventory => &[PRODUCT_GROUP, DIVISION],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Inbound => "inbound",
            Role::Outbound => "outbound",
            Role::Inventory => "inventory",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const LATE: &str = "Late";
pub const VENDOR_NAME: &str = "Vendor Name";
pub const UNITS: &str = "Units";
pub const TRANSIT_MODE: &str = "Transit_Mode";
pub const REASON_CODE: &str = "Reason_Code";

pub const UNITS_ORDERED: &str = "Units_Ordered";
pub const UNITS_INVOICED: &str = "Units_Invoiced";
pub const CHANNEL: &str = "Channel";
pub const AVG_PRICE: &str = "Avg_Price";
pub const MARGIN_PCT: &str = "Margin_Pct";

pub const PRODUCT_GROUP: &str = "Product Group";
pub const DIVISION: &str = "Division";

// Blank categorical values are treated like absent ones.
fn category<'a>(rec: &'a Record, key: &str) -> Option<&'a str> {
    rec.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InboundRow<'a> {
    pub late: Option<&'a str>,
    pub vendor: Option<&'a str>,
    pub units: Option<&'a str>,
    pub transit_mode: Option<&'a str>,
    pub reason_code: Option<&'a str>,
}

impl<'a> InboundRow<'a> {
    pub fn from_record(rec: &'a Record) -> Self {
        Self {
            late: rec.get(LATE).map(String::as_str),
            vendor: category(rec, VENDOR_NAME),
            units: rec.get(UNITS).map(String::as_str),
            transit_mode: category(rec, TRANSIT_MODE),
            reason_code: category(rec, REASON_CODE),
        }
    }

    /// Only the exact value `No` counts as on time.
    pub fn on_time(&self) -> bool {
        self.late == Some("No")
    }

    pub fn units(&self) -> i64 {
        coerce::int_or_zero(self.units)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutboundRow<'a> {
    pub units_ordered: Option<&'a str>,
    pub units_invoiced: Option<&'a str>,
    pub channel: Option<&'a str>,
    pub avg_price: Option<&'a str>,
    pub margin_pct: Option<&'a str>,
}

impl<'a> OutboundRow<'a> {
    pub fn from_record(rec: &'a Record) -> Self {
        Self {
            units_ordered: rec.get(UNITS_ORDERED).map(String::as_str),
            units_invoiced: rec.get(UNITS_INVOICED).map(String::as_str),
            channel: category(rec, CHANNEL),
            avg_price: rec.get(AVG_PRICE).map(String::as_str),
            margin_pct: rec.get(MARGIN_PCT).map(String::as_str),
        }
    }

    pub fn units_ordered(&self) -> i64 {
        coerce::int_or_zero(self.units_ordered)
    }

    pub fn units_invoiced(&self) -> i64 {
        coerce::int_or_zero(self.units_invoiced)
    }

    pub fn avg_price(&self) -> f64 {
        coerce::float_or_zero(self.avg_price)
    }

    pub fn margin(&self) -> f64 {
        coerce::float_or_zero(self.margin_pct)
    }

    /// Avg_Price x Units_Invoiced for this order line.
    pub fn revenue(&self) -> f64 {
        self.avg_price() * self.units_invoiced() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryRow<'a> {
    pub product_group: Option<&'a str>,
    pub division: Option<&'a str>,
}

impl<'a> InventoryRow<'a> {
    pub fn from_record(rec: &'a Record) -> Self {
        Self {
            product_group: category(rec, PRODUCT_GROUP),
            division: category(rec, DIVISION),
        }
    }
}
