//! Lock-free, read-mostly cache of the selection menus.
//!
//! The front-end asks for menu values on nearly every interaction; going
//! to the database each time buys nothing because the menus only change on
//! refresh. Readers call [`menu_snapshot`], which loads an
//! `Arc<HashMap<..>>` snapshot with no locking contention. The refresh
//! pipeline calls [`refresh_menus`] after rebuilding the stored menus to
//! atomically swap in a new snapshot.
//!
//! Initializes empty; until the first `refresh_menus`, every lookup
//! returns `None`.

use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwap;
use diesel::prelude::*;
use once_cell::sync::Lazy;

use crate::schema::menu_entry::dsl as me;
use crate::store::StoreResult;

/// Snapshot type held inside the cache: menu name -> sorted values.
type MenuMap = HashMap<String, Vec<String>>;

static MENUS: Lazy<ArcSwap<MenuMap>> = Lazy::new(|| ArcSwap::from_pointee(MenuMap::new()));

/// Values of one menu from the in-memory snapshot, without touching the
/// database. `None` for an unknown menu (or before the first refresh).
pub fn menu_snapshot(menu: &str) -> Option<Vec<String>> {
    MENUS.load().get(menu).cloned()
}

/// Rebuild the snapshot from the database and atomically swap it in.
///
/// Safe to call from any thread; readers see either the old or the new
/// snapshot.
pub fn refresh_menus(conn: &mut SqliteConnection) -> StoreResult<()> {
    let rows: Vec<(String, String)> = me::menu_entry
        .select((me::menu, me::value))
        .order((me::menu.asc(), me::value.asc()))
        .load(conn)?;

    let mut map = MenuMap::new();
    for (menu, value) in rows {
        map.entry(menu).or_default().push(value);
    }
    MENUS.store(Arc::new(map));
    Ok(())
}

/// Reset the cache to empty. Useful for tests.
pub fn clear_menu_cache() {
    MENUS.store(Arc::new(MenuMap::new()));
}
