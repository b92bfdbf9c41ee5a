use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Purely random generation: the configured number of mines is drawn
/// uniformly without replacement from the full cell range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineLayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let total_cells = config.total_cells();

        // optimize for full boards
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "board already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(
                config.size.to_nd_index(),
                true,
            ));
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut free_cells = total_cells;
        let mut mines_placed = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines_placed < config.mines && free_cells > 0 {
            // draw a rank among the still-free cells, so every pick is distinct
            let mut place: CellCount = rng.random_range(0..free_cells);
            for index in 0..total_cells {
                let cell = &mut mine_mask[coords_of(index, config.size).to_nd_index()];
                if *cell {
                    place += 1;
                }
                if index == place {
                    *cell = true;
                    mines_placed += 1;
                    free_cells -= 1;
                    break;
                }
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        if layout.mine_count() != config.mines {
            log::warn!(
                "generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        layout
    }
}
