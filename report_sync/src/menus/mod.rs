//! Selection menus: the precomputed name lists that drive the front-end's
//! choice keyboards.
//!
//! Menu `"italy"` holds the distinct region names; every region name is
//! itself a menu holding that region's distinct province names. All values
//! are sorted ascending (ordinal, case-sensitive). The whole set is
//! rebuilt from the current series after every successful refresh, so the
//! menus can never lag behind the stored data.

pub mod cache;

use std::collections::BTreeMap;

use diesel::prelude::*;

use crate::models::MenuEntry;
use crate::schema::{menu_entry, provinces, regions};
use crate::store::StoreResult;

/// Name of the top-level menu listing the regions.
pub const ITALY_MENU: &str = "italy";

/// Recompute every menu from the current regions/provinces series,
/// replacing the prior set in one transaction.
pub fn rebuild(conn: &mut SqliteConnection) -> StoreResult<()> {
    let mut region_names: Vec<String> = regions::table
        .select(regions::region)
        .distinct()
        .load(conn)?;
    region_names.sort();

    let pairs: Vec<(String, String)> = provinces::table
        .select((provinces::region, provinces::province))
        .distinct()
        .load(conn)?;

    let mut per_region: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (region, province) in pairs {
        per_region.entry(region).or_default().push(province);
    }

    let mut rows: Vec<MenuEntry> = Vec::new();
    for name in &region_names {
        rows.push(MenuEntry {
            menu: ITALY_MENU.to_string(),
            value: name.clone(),
        });
    }
    for (region, mut province_names) in per_region {
        province_names.sort();
        for name in province_names {
            rows.push(MenuEntry {
                menu: region.clone(),
                value: name,
            });
        }
    }

    conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(menu_entry::table).execute(conn)?;
        diesel::insert_into(menu_entry::table)
            .values(&rows)
            .execute(conn)?;
        Ok(())
    })?;
    Ok(())
}

/// Values of one menu, sorted ascending. `None` for an unknown menu name.
pub fn menu_values(conn: &mut SqliteConnection, menu: &str) -> StoreResult<Option<Vec<String>>> {
    let values: Vec<String> = menu_entry::table
        .filter(menu_entry::menu.eq(menu))
        .select(menu_entry::value)
        .order(menu_entry::value.asc())
        .load(conn)?;
    Ok(if values.is_empty() { None } else { Some(values) })
}
