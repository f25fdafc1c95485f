// ── Remote inventory store ──

pub(crate) mod inventory;

pub(crate) use inventory::InventoryCache;
