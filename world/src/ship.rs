//! Append-only storage for the player's hex ship.

use std::collections::{BTreeSet, HashMap};

use hexbound_core::{
    AttachError, CellColor, CellId, CellKind, HexCell, HexCoord, ShipCell, ShipView,
};

/// Integrity of the core cell before synergy bonuses.
pub(crate) const CORE_HEALTH: f32 = 100.0;
/// Integrity of every module cell.
pub(crate) const MODULE_HEALTH: f32 = 40.0;

/// Sparse hex ship stored as a dense arena indexed by [`CellId`].
///
/// The core always sits at the origin with identifier zero. Cells are never
/// removed, so identifiers stay valid for the lifetime of the ship.
#[derive(Debug)]
pub(crate) struct Ship {
    cells: Vec<ShipCell>,
    lookup: HashMap<HexCoord, CellId>,
    version: u64,
    core_bonus: f32,
}

impl Ship {
    pub(crate) fn new(core_color: CellColor) -> Self {
        let core = ShipCell {
            id: CellId::new(0),
            coord: HexCoord::ORIGIN,
            cell: HexCell {
                kind: CellKind::Core,
                color: core_color,
                health: CORE_HEALTH,
                max_health: CORE_HEALTH,
            },
        };
        let mut lookup = HashMap::new();
        let _ = lookup.insert(HexCoord::ORIGIN, core.id);
        Self {
            cells: vec![core],
            lookup,
            version: 0,
            core_bonus: 0.0,
        }
    }

    pub(crate) fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn view(&self) -> ShipView<'_> {
        ShipView::new(self.version, &self.cells, &self.lookup)
    }

    pub(crate) fn cells(&self) -> &[ShipCell] {
        &self.cells
    }

    /// Attaches a module at `coord`, bumping the version on success.
    pub(crate) fn attach(&mut self, coord: HexCoord, color: CellColor) -> Result<CellId, AttachError> {
        if self.lookup.contains_key(&coord) {
            return Err(AttachError::Occupied(coord));
        }
        if !coord
            .neighbors()
            .iter()
            .any(|neighbor| self.lookup.contains_key(neighbor))
        {
            return Err(AttachError::NotAdjacent(coord));
        }

        let id = next_cell_id(self.cells.len())?;
        self.cells.push(ShipCell {
            id,
            coord,
            cell: HexCell {
                kind: CellKind::Module,
                color,
                health: MODULE_HEALTH,
                max_health: MODULE_HEALTH,
            },
        });
        let _ = self.lookup.insert(coord, id);
        self.version = self.version.saturating_add(1);
        Ok(id)
    }

    /// Reports whether a module could be attached at `coord` right now.
    pub(crate) fn can_attach(&self, coord: HexCoord) -> bool {
        !self.lookup.contains_key(&coord)
            && coord
                .neighbors()
                .iter()
                .any(|neighbor| self.lookup.contains_key(neighbor))
    }

    /// Empty coordinates adjacent to at least one occupied cell, sorted.
    pub(crate) fn attachment_sites(&self) -> Vec<HexCoord> {
        let mut sites = BTreeSet::new();
        for cell in &self.cells {
            for neighbor in cell.coord.neighbors() {
                if !self.lookup.contains_key(&neighbor) {
                    let _ = sites.insert(neighbor);
                }
            }
        }
        sites.into_iter().collect()
    }

    pub(crate) fn core_health(&self) -> f32 {
        self.cells[0].cell.health
    }

    /// Applies contact damage to `id`. Modules absorb what they can and the
    /// overflow reaches the core. Returns the remaining core health, or
    /// `None` when the cell does not exist.
    pub(crate) fn damage(&mut self, id: CellId, amount: f32) -> Option<f32> {
        let index = id.index();
        if index >= self.cells.len() {
            return None;
        }

        let mut overflow = amount.max(0.0);
        if index != 0 {
            let cell = &mut self.cells[index].cell;
            let absorbed = overflow.min(cell.health);
            cell.health -= absorbed;
            overflow -= absorbed;
        }

        let core = &mut self.cells[0].cell;
        core.health = (core.health - overflow).max(0.0);
        Some(core.health)
    }

    /// Heals every cell by `amount`, capped at its maximum.
    pub(crate) fn regenerate(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        for cell in &mut self.cells {
            cell.cell.health = (cell.cell.health + amount).min(cell.cell.max_health);
        }
    }

    /// Sets the synergy bonus on the core's maximum health. A raised maximum
    /// also grants the difference as current health.
    pub(crate) fn set_core_bonus(&mut self, bonus: f32) {
        let bonus = bonus.max(0.0);
        let delta = bonus - self.core_bonus;
        self.core_bonus = bonus;

        let core = &mut self.cells[0].cell;
        core.max_health = CORE_HEALTH + bonus;
        if delta > 0.0 {
            core.health += delta;
        }
        core.health = core.health.min(core.max_health);
    }
}

/// Identifier of the cell appended to an arena of `len` cells.
fn next_cell_id(len: usize) -> Result<CellId, AttachError> {
    u32::try_from(len)
        .map(CellId::new)
        .map_err(|_| AttachError::ShipFull)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ship_holds_only_the_core_at_origin() {
        let ship = Ship::new(CellColor::Blue);
        let view = ship.view();
        assert_eq!(view.len(), 1);
        let core = view.cell_at(HexCoord::ORIGIN).expect("core");
        assert_eq!(core.cell.kind, CellKind::Core);
        assert_eq!(core.id, CellId::new(0));
        assert_eq!(ship.version(), 0);
    }

    #[test]
    fn attach_requires_adjacency_and_free_cell() {
        let mut ship = Ship::new(CellColor::Red);
        assert_eq!(
            ship.attach(HexCoord::ORIGIN, CellColor::Red),
            Err(AttachError::Occupied(HexCoord::ORIGIN))
        );
        assert_eq!(
            ship.attach(HexCoord::new(2, 0), CellColor::Red),
            Err(AttachError::NotAdjacent(HexCoord::new(2, 0)))
        );
        assert_eq!(ship.version(), 0);

        let id = ship.attach(HexCoord::new(1, 0), CellColor::Green).expect("attach");
        assert_eq!(id, CellId::new(1));
        assert_eq!(ship.version(), 1);
        assert!(ship.attach(HexCoord::new(2, 0), CellColor::Red).is_ok());
        assert_eq!(ship.version(), 2);
    }

    #[test]
    fn attachment_sites_surround_the_ship() {
        let mut ship = Ship::new(CellColor::Red);
        assert_eq!(ship.attachment_sites().len(), 6);
        let _ = ship.attach(HexCoord::new(1, 0), CellColor::Red).expect("attach");
        let sites = ship.attachment_sites();
        assert_eq!(sites.len(), 8);
        assert!(sites.iter().all(|site| ship.can_attach(*site)));
    }

    #[test]
    fn module_damage_overflows_into_core() {
        let mut ship = Ship::new(CellColor::Red);
        let module = ship.attach(HexCoord::new(0, 1), CellColor::Blue).expect("attach");
        assert_eq!(ship.damage(module, 30.0), Some(CORE_HEALTH));
        assert_eq!(ship.damage(module, 30.0), Some(CORE_HEALTH - 20.0));
        assert_eq!(ship.damage(CellId::new(0), 500.0), Some(0.0));
        assert_eq!(ship.damage(CellId::new(44), 1.0), None);
    }

    #[test]
    fn core_bonus_raises_maximum_and_current_health() {
        let mut ship = Ship::new(CellColor::Green);
        let _ = ship.damage(CellId::new(0), 50.0);
        ship.set_core_bonus(30.0);
        assert!((ship.core_health() - 80.0).abs() < f32::EPSILON);
        ship.regenerate(1_000.0);
        assert!((ship.core_health() - 130.0).abs() < f32::EPSILON);
        ship.set_core_bonus(0.0);
        assert!((ship.core_health() - CORE_HEALTH).abs() < f32::EPSILON);
    }

    #[test]
    fn cell_ids_stop_at_the_u32_range() {
        assert_eq!(next_cell_id(7), Ok(CellId::new(7)));
        let last = u32::MAX as usize;
        assert_eq!(next_cell_id(last), Ok(CellId::new(u32::MAX)));
        if let Some(past) = last.checked_add(1) {
            assert_eq!(next_cell_id(past), Err(AttachError::ShipFull));
        }
    }
}
