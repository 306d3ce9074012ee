//! FILENAME: engine/src/sheet.rs
//! PURPOSE: The sparse cell store and the transactional write path:
//! `set_cell` / `clear_cell` / printable-region rendering.
//! CONTEXT: This is the orchestration layer — it owns `cells` and the
//! dependency graph and is the only place that mutates either. Formula
//! parsing and evaluation are delegated to the `FormulaParser`/`Formula`
//! collaborator; the sheet never names a concrete grammar.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Write as _;

use log::{debug, trace};

use crate::cell::{Cell, CellContent};
use crate::dependency_graph::DependencyGraph;
use crate::error::SheetError;
use crate::formula::{FormulaParser, SheetView};
use crate::position::{Position, Size, FORMULA_SIGN};
use crate::value::Value;

/// The spreadsheet: sparse cell storage plus the dependency graph that
/// makes reactive recomputation possible.
pub struct Sheet {
    cells: HashMap<Position, Cell>,
    graph: DependencyGraph,
    parser: Box<dyn FormulaParser>,
}

impl Sheet {
    pub fn new(parser: Box<dyn FormulaParser>) -> Self {
        Sheet {
            cells: HashMap::new(),
            graph: DependencyGraph::new(),
            parser,
        }
    }

    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }
        Ok(self.cells.get(&pos))
    }

    /// Convenience wrapper around `Cell::get_value` that supplies `self` as
    /// the view; absent cells evaluate as empty text.
    pub fn get_value(&self, pos: Position) -> Result<Value, SheetError> {
        match self.get_cell(pos)? {
            Some(cell) => Ok(cell.get_value(self)),
            None => Ok(Value::Text(String::new())),
        }
    }

    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }
        if text.is_empty() {
            return self.clear_cell(pos);
        }

        let is_formula = text.len() > 1 && text.starts_with(FORMULA_SIGN);
        let new_cell = if is_formula {
            let expr = &text[FORMULA_SIGN.len_utf8()..];
            let formula = self
                .parser
                .parse(expr)
                .map_err(|e| SheetError::FormulaException(e.0))?;
            Cell::new_formula(formula)
        } else {
            Cell::new_text(text.to_string())
        };

        // 1. Equality short-circuit: same canonical text, no-op.
        if let Some(existing) = self.cells.get(&pos) {
            if existing.get_text() == new_cell.get_text() {
                trace!("set_cell({pos}) is a no-op: text unchanged");
                return Ok(());
            }
        }

        let new_refs = new_cell.referenced_cells();

        // 2. Cycle check: BFS over forward refs from the candidate's refs;
        // missing cells have no outgoing edges.
        if self.reaches(&new_refs, pos) {
            return Err(SheetError::CircularDependency);
        }

        // 3. Materialize phantom references.
        for r in &new_refs {
            self.cells.entry(*r).or_insert_with(Cell::new_empty);
        }

        // 4. Rewire edges.
        let old_refs = self
            .cells
            .get(&pos)
            .map(|c| c.referenced_cells())
            .unwrap_or_default();
        self.graph.rewire(pos, &old_refs, &new_refs);
        self.gc_dropped_phantoms(&old_refs, &new_refs);

        // 5. Install.
        self.cells.insert(pos, new_cell);

        // 6. Invalidate transitively.
        self.invalidate_transitively(pos);

        debug!("set_cell({pos}) committed, {} dependents invalidated", new_refs.len());
        Ok(())
    }

    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }
        if !self.cells.contains_key(&pos) {
            return Ok(());
        }

        let old_refs = self
            .cells
            .get(&pos)
            .map(|c| c.referenced_cells())
            .unwrap_or_default();
        self.graph.rewire(pos, &old_refs, &[]);
        self.gc_dropped_phantoms(&old_refs, &[]);

        let is_referenced = self.graph.dependents_of(pos).next().is_some();
        if is_referenced {
            self.cells.insert(pos, Cell::new_empty());
        } else {
            self.cells.remove(&pos);
            self.graph.forget(pos);
        }

        self.invalidate_transitively(pos);
        Ok(())
    }

    /// Smallest `rows x cols` rectangle anchored at `(0,0)` covering every
    /// non-empty cell; materialized-empty anchors don't count.
    pub fn get_printable_size(&self) -> Size {
        let mut max_row = -1;
        let mut max_col = -1;
        for (pos, cell) in &self.cells {
            if matches!(cell.content(), CellContent::Empty) {
                continue;
            }
            max_row = max_row.max(pos.row);
            max_col = max_col.max(pos.col);
        }
        if max_row < 0 {
            Size::new(0, 0)
        } else {
            Size::new(max_row + 1, max_col + 1)
        }
    }

    pub fn print_values(&self, out: &mut String) -> std::fmt::Result {
        self.print_rectangle(out, |cell| cell.get_value(self).to_string())
    }

    pub fn print_texts(&self, out: &mut String) -> std::fmt::Result {
        self.print_rectangle(out, |cell| cell.get_text())
    }

    fn print_rectangle(
        &self,
        out: &mut String,
        render: impl Fn(&Cell) -> String,
    ) -> std::fmt::Result {
        let size = self.get_printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(out, "\t")?;
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    write!(out, "{}", render(cell))?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// True if `target` is reachable from any of `starts` via forward
    /// references. Missing cells are leaves.
    fn reaches(&self, starts: &[Position], target: Position) -> bool {
        let mut visited: HashSet<Position> = HashSet::new();
        let mut queue: VecDeque<Position> = starts.iter().copied().collect();
        while let Some(pos) = queue.pop_front() {
            if pos == target {
                return true;
            }
            if !visited.insert(pos) {
                continue;
            }
            if let Some(cell) = self.cells.get(&pos) {
                queue.extend(cell.referenced_cells());
            }
        }
        false
    }

    fn invalidate_transitively(&self, start: Position) {
        for pos in self.graph.transitive_dependents(start) {
            if let Some(cell) = self.cells.get(&pos) {
                cell.invalidate();
            }
        }
    }

    /// After an edge rewire drops `old_refs \ new_refs`, a dropped position
    /// that was only a materialized phantom (`Empty`, kept alive purely as
    /// a dependency anchor) and now has no dependents left must be removed
    /// outright — otherwise it lingers in `cells` forever, violating
    /// invariant 5.
    fn gc_dropped_phantoms(&mut self, old_refs: &[Position], new_refs: &[Position]) {
        for r in old_refs {
            if new_refs.contains(r) {
                continue;
            }
            self.gc_if_orphaned_phantom(*r);
        }
    }

    fn gc_if_orphaned_phantom(&mut self, r: Position) {
        if self.graph.dependents_of(r).next().is_some() {
            return;
        }
        if matches!(self.cells.get(&r).map(Cell::content), Some(CellContent::Empty)) {
            self.cells.remove(&r);
        }
    }
}

impl SheetView for Sheet {
    fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }
}
