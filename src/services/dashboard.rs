//! Dashboard aggregations computed in memory over the stored records.

use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::{area, machine, oem, part};
use crate::error::AppResult;
use crate::models::{
    AreaMachineCount, AreaOems, DashboardSummary, MachinePartEntry, MachineParts, OemQuantity,
    PartQuantity,
};

/// Area label used when a machine points at a missing area.
const UNKNOWN_AREA: &str = "Unknown";

/// Load everything and aggregate.
pub async fn load_summary(pool: &DbPool) -> AppResult<DashboardSummary> {
    let areas = pool.list_areas().await?;
    let machines = pool.list_machines().await?;
    let oems = pool.list_oems().await?;
    let parts = pool.list_parts().await?;

    Ok(summarize(&areas, &machines, &oems, &parts))
}

pub fn summarize(
    areas: &[area::Model],
    machines: &[machine::Model],
    oems: &[oem::Model],
    parts: &[part::Model],
) -> DashboardSummary {
    let areas: HashMap<Uuid, &area::Model> = areas.iter().map(|a| (a.id, a)).collect();
    let machines: HashMap<Uuid, &machine::Model> = machines.iter().map(|m| (m.id, m)).collect();
    let oems: HashMap<Uuid, &oem::Model> = oems.iter().map(|o| (o.id, o)).collect();

    DashboardSummary {
        area_wise_machines: area_wise_machines(&areas, &machines, parts),
        machine_wise_parts: machine_wise_parts(&machines, parts),
        part_wise_quantities: part_wise_quantities(parts),
        area_wise_oems: area_wise_oems(&areas, &machines, &oems, parts),
    }
}

/// Distinct machines that carry at least one part, counted per area.
fn area_wise_machines(
    areas: &HashMap<Uuid, &area::Model>,
    machines: &HashMap<Uuid, &machine::Model>,
    parts: &[part::Model],
) -> Vec<AreaMachineCount> {
    let mut by_area: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for part in parts {
        if let Some(machine) = machines.get(&part.machine_id) {
            by_area.entry(machine.area_id).or_default().insert(machine.id);
        }
    }

    let mut counts: Vec<AreaMachineCount> = by_area
        .into_iter()
        .map(|(area_id, machine_ids)| AreaMachineCount {
            area_id,
            area_name: areas
                .get(&area_id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| UNKNOWN_AREA.to_string()),
            total_machines: machine_ids.len(),
        })
        .collect();

    counts.sort_by(|a, b| {
        b.total_machines
            .cmp(&a.total_machines)
            .then_with(|| a.area_name.cmp(&b.area_name))
    });
    counts
}

/// Parts grouped by machine name. Machines sharing a name share a group.
fn machine_wise_parts(
    machines: &HashMap<Uuid, &machine::Model>,
    parts: &[part::Model],
) -> Vec<MachineParts> {
    let mut by_name: BTreeMap<&str, Vec<MachinePartEntry>> = BTreeMap::new();
    for part in parts {
        if let Some(machine) = machines.get(&part.machine_id) {
            by_name
                .entry(machine.name.as_str())
                .or_default()
                .push(MachinePartEntry {
                    part_no: part.part_no.clone(),
                    part_detail: part.part_detail.clone(),
                    installed_quantity: part.installed_quantity,
                    available_quantity: part.available_quantity,
                });
        }
    }

    by_name
        .into_iter()
        .map(|(name, parts)| MachineParts {
            machine_name: name.to_string(),
            parts,
        })
        .collect()
}

fn part_wise_quantities(parts: &[part::Model]) -> Vec<PartQuantity> {
    let mut totals: HashMap<&str, (i64, i64)> = HashMap::new();
    for part in parts {
        let entry = totals.entry(part.part_no.as_str()).or_default();
        entry.0 += i64::from(part.installed_quantity);
        entry.1 += i64::from(part.available_quantity);
    }

    let mut quantities: Vec<PartQuantity> = totals
        .into_iter()
        .map(|(part_no, (installed, available))| PartQuantity {
            part_no: part_no.to_string(),
            total_installed: installed,
            total_available: available,
        })
        .collect();

    quantities.sort_by(|a, b| {
        b.total_installed
            .cmp(&a.total_installed)
            .then_with(|| a.part_no.cmp(&b.part_no))
    });
    quantities
}

/// Installed quantity per OEM within each area. Parts whose machine, OEM or
/// area cannot be found are left out.
fn area_wise_oems(
    areas: &HashMap<Uuid, &area::Model>,
    machines: &HashMap<Uuid, &machine::Model>,
    oems: &HashMap<Uuid, &oem::Model>,
    parts: &[part::Model],
) -> Vec<AreaOems> {
    let mut by_area: HashMap<Uuid, BTreeMap<&str, i64>> = HashMap::new();
    for part in parts {
        let Some(machine) = machines.get(&part.machine_id) else {
            continue;
        };
        let Some(oem) = oems.get(&part.oem_id) else {
            continue;
        };
        if !areas.contains_key(&machine.area_id) {
            continue;
        }

        *by_area
            .entry(machine.area_id)
            .or_default()
            .entry(oem.name.as_str())
            .or_default() += i64::from(part.installed_quantity);
    }

    let mut result: Vec<AreaOems> = by_area
        .into_iter()
        .filter_map(|(area_id, totals)| {
            let area = areas.get(&area_id)?;
            Some(AreaOems {
                area_id,
                area_name: area.name.clone(),
                oems: totals
                    .into_iter()
                    .map(|(name, total)| OemQuantity {
                        name: name.to_string(),
                        total_installed_quantity: total,
                    })
                    .collect(),
            })
        })
        .collect();

    result.sort_by(|a, b| a.area_name.cmp(&b.area_name));
    result
}
