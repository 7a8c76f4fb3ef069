use log::debug;
use std::collections::HashMap;

use crate::core::models::{FinalSplit, Item, ItemizedSplit, MemberName, MemberSplit};

/// Computes per-member totals, traces, and the itemized breakdown.
///
/// Every roster member gets an entry, even with a zero total. An item with no
/// assigned members keeps its full price as split price and adds to the bill
/// total and to `unassigned_total`, but to no member's total. Negative or
/// non-finite prices count as zero.
pub fn calculate_splits(items: &[Item], roster: &[MemberName]) -> FinalSplit {
    let mut order: Vec<MemberName> = roster.to_vec();
    let mut totals: HashMap<MemberName, f64> = roster.iter().map(|m| (m.clone(), 0.0)).collect();
    let mut traces: HashMap<MemberName, Vec<String>> = HashMap::new();
    let mut total_bill = 0.0;
    let mut unassigned_total = 0.0;
    let mut itemized = Vec::with_capacity(items.len());

    for item in items {
        let assigned = item.assigned_members(roster);
        let price = item.amount();
        let split_price = item.split_price();
        total_bill += price;
        if assigned.is_empty() {
            unassigned_total += price;
        }

        for member in &assigned {
            if !totals.contains_key(member) {
                order.push(member.clone());
            }
            *totals.entry(member.clone()).or_insert(0.0) += split_price;
            traces
                .entry(member.clone())
                .or_default()
                .push(format!("{}=${:.2}", item.name, split_price));
        }

        itemized.push(ItemizedSplit {
            name: item.name.clone(),
            price,
            split_price,
            members: assigned,
        });
    }

    let members = order
        .into_iter()
        .map(|member| MemberSplit {
            item_splits: traces.remove(&member).map(|t| t.join(", ")).unwrap_or_default(),
            total: totals.get(&member).copied().unwrap_or(0.0),
            member,
        })
        .collect();

    debug!(
        "Calculated splits for {} items over {} members: bill {:.2}, unassigned {:.2}",
        items.len(),
        roster.len(),
        total_bill,
        unassigned_total
    );

    FinalSplit {
        total_bill,
        members,
        itemized,
        unassigned_total,
    }
}
