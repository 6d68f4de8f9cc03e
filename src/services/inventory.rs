//! Part creation shared by bulk upload and manual entry.

use crate::db::DbPool;
use crate::db::parts::NewPart;
use crate::entity::part;
use crate::error::AppResult;
use crate::models::ValidatedRow;
use crate::services::resolver::EntityResolver;

/// Resolve the row's area, machine and OEM (in that order) and insert a new part.
///
/// A part is created every time; identical rows yield distinct parts.
pub async fn record_part(
    pool: &DbPool,
    resolver: &EntityResolver,
    row: &ValidatedRow,
) -> AppResult<part::Model> {
    let area = resolver.resolve_area(&row.area).await?;
    let machine = resolver
        .resolve_machine(&row.machine, &row.machine_no, area.id)
        .await?;
    let oem = resolver.resolve_oem(&row.oem, None).await?;

    pool.insert_part(NewPart {
        machine_id: machine.id,
        oem_id: oem.id,
        part_no: &row.part_no,
        part_detail: &row.part_detail,
        installed_quantity: row.installed_quantity,
        available_quantity: row.available_quantity,
    })
    .await
}
