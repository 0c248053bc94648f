use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use crate::common::{Agent, MAX_TIMESTEP};

#[derive(Debug, Clone)]
pub struct Tile {
    passable: bool,
    pub neighbors: Vec<(usize, usize)>, // Stores coordinates of accessible neighbors
}

impl Tile {
    pub fn is_passable(&self) -> bool {
        self.passable
    }
}

#[derive(Debug, Clone)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Tile>>,
    // Per agent BFS distance to its goal, ignoring the other agents.
    pub heuristic: Vec<Vec<Vec<usize>>>,
}

impl Map {
    pub fn from_file(path: &str, agents: &[Agent]) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let _type = lines.next().unwrap()?;
        let height = lines
            .next()
            .unwrap()?
            .split_whitespace()
            .last()
            .unwrap()
            .parse::<usize>()
            .unwrap();
        let width = lines
            .next()
            .unwrap()?
            .split_whitespace()
            .last()
            .unwrap()
            .parse::<usize>()
            .unwrap();
        let _map = lines.next().unwrap()?;

        let mut rows = Vec::with_capacity(height);
        for line in lines.take(height) {
            rows.push(line?);
        }

        Ok(Self::from_rows(height, width, &rows, agents))
    }

    /// Build a map straight from ASCII rows ('.' passable, anything else
    /// blocked). Used by tests and by `from_file` after the header.
    pub fn from_ascii(ascii: &str, agents: &[Agent]) -> Self {
        let rows: Vec<String> = ascii
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        Self::from_rows(height, width, &rows, agents)
    }

    fn from_rows(height: usize, width: usize, rows: &[String], agents: &[Agent]) -> Self {
        let mut grid = Vec::with_capacity(height);
        for row in rows {
            let tiles_row: Vec<Tile> = row
                .chars()
                .map(|ch| Tile {
                    passable: ch == '.',
                    neighbors: Vec::new(),
                })
                .collect();
            grid.push(tiles_row);
        }

        let mut map = Map {
            height,
            width,
            grid,
            heuristic: Vec::new(),
        };
        map.initialize_neighbors();
        map.initialize_heuristics(agents);

        map
    }

    fn initialize_neighbors(&mut self) {
        for x in 0..self.height {
            for y in 0..self.width {
                if self.grid[x][y].passable {
                    self.grid[x][y].neighbors = self.get_neighbors(x, y);
                }
            }
        }
    }

    // Backward BFS from every agent's goal, so the table is admissible under
    // the obstacle layout. Unreachable cells keep MAX_TIMESTEP.
    fn initialize_heuristics(&mut self, agents: &[Agent]) {
        let heuristic = agents
            .iter()
            .map(|agent| {
                let mut distance = vec![vec![MAX_TIMESTEP; self.width]; self.height];
                let mut queue = VecDeque::new();
                distance[agent.goal.0][agent.goal.1] = 0;
                queue.push_back(agent.goal);
                while let Some((x, y)) = queue.pop_front() {
                    for &(nx, ny) in &self.grid[x][y].neighbors {
                        if distance[nx][ny] == MAX_TIMESTEP {
                            distance[nx][ny] = distance[x][y] + 1;
                            queue.push_back((nx, ny));
                        }
                    }
                }
                distance
            })
            .collect();
        self.heuristic = heuristic;
    }

    pub fn get_neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let directions = [(-1, 0), (1, 0), (0, -1), (0, 1)]; // Up, down, left, right
        let mut neighbors = Vec::new();

        for &(dx, dy) in &directions {
            let new_x = x as i32 + dx;
            let new_y = y as i32 + dy;
            if new_x >= 0
                && new_y >= 0
                && new_x < self.height as i32
                && new_y < self.width as i32
                && self.grid[new_x as usize][new_y as usize].passable
            {
                neighbors.push((new_x as usize, new_y as usize));
            }
        }

        neighbors
    }

    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        self.grid[x][y].is_passable()
    }

    pub fn manhattan(&self, from: (usize, usize), to: (usize, usize)) -> usize {
        from.0.abs_diff(to.0) + from.1.abs_diff(to.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_map() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (2, 2),
        };
        let map = Map::from_ascii(
            "...
             .@.
             ...",
            &[agent],
        );

        assert_eq!(map.height, 3);
        assert_eq!(map.width, 3);
        assert!(map.is_passable(0, 0));
        assert!(!map.is_passable(1, 1));

        let neighbors = map.get_neighbors(0, 1);
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&(0, 0)));
        assert!(neighbors.contains(&(0, 2)));
    }

    #[test]
    fn test_heuristic_detours_around_obstacles() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (2, 2),
        };
        let map = Map::from_ascii(
            "...
             .@.
             ...",
            &[agent],
        );

        assert_eq!(map.heuristic[0][2][2], 0);
        assert_eq!(map.heuristic[0][0][0], 4);
        assert_eq!(map.heuristic[0][0][2], 2);
    }

    #[test]
    fn test_heuristic_unreachable() {
        let agent = Agent {
            id: 0,
            start: (0, 0),
            goal: (2, 2),
        };
        let map = Map::from_ascii(
            "..@
             .@@
             @@.",
            &[agent],
        );

        assert_eq!(map.heuristic[0][0][0], MAX_TIMESTEP);
        assert_eq!(map.heuristic[0][2][2], 0);
    }
}
