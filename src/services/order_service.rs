//! Orders are not stored separately: a seller's orders are their listings
//! whose status is `reserved` or `sold`. This module derives those views.

use crate::models::product::{Product, ProductStatus};
use serde::Serialize;

/// Per-status listing counts for the seller dashboard.
#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub available: usize,
    pub reserved: usize,
    pub sold: usize,
}

impl StatusCounts {
    pub fn tally(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |mut acc, p| {
            match p.status {
                ProductStatus::Available => acc.available += 1,
                ProductStatus::Reserved => acc.reserved += 1,
                ProductStatus::Sold => acc.sold += 1,
            }
            acc
        })
    }
}

/// Sales figures over a seller's orders.
#[derive(Serialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub sold_count: usize,
    pub reserved_count: usize,
    /// Sum of prices of sold listings.
    pub revenue: f64,
}

#[derive(Serialize, Debug)]
pub struct OrderSummary {
    pub orders: Vec<Product>,
    pub stats: SalesStats,
}

/// Keep only the listings that count as orders.
pub fn orders_of(products: Vec<Product>) -> Vec<Product> {
    products.into_iter().filter(|p| p.status.is_order()).collect()
}

pub fn sales_stats(orders: &[Product]) -> SalesStats {
    let mut stats = SalesStats::default();
    for order in orders {
        match order.status {
            ProductStatus::Sold => {
                stats.sold_count += 1;
                stats.revenue += order.price;
            }
            ProductStatus::Reserved => stats.reserved_count += 1,
            ProductStatus::Available => {}
        }
    }
    stats
}

/// Build the order view for one seller from all of their listings.
pub fn summarize(products: Vec<Product>) -> OrderSummary {
    let orders = orders_of(products);
    let stats = sales_stats(&orders);
    OrderSummary { orders, stats }
}
