use indexmap::IndexMap;
use sheetorm_core::{
    async_trait,
    driver::{
        operation::{AppendRows, DeleteRows, MaxNumericValue, Operation, UpdateRows},
        Driver, Response,
    },
    err,
    schema::{coerce, Schemas},
    stmt::{record, Record, Value},
    Result, Schema,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An in-process table store holding raw string cells, one sheet per
/// registered schema.
///
/// Clones share the same sheets, so a test can keep a handle after passing
/// the driver to `Db::builder().build(...)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    sheets: Arc<Mutex<IndexMap<String, Sheet>>>,
}

#[derive(Debug)]
struct Sheet {
    schema: Arc<Schema>,

    /// Row 1
    header: Vec<String>,

    /// Rows 2 and up
    rows: Vec<Vec<String>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records to a registered table, bypassing the engine.
    pub fn seed(&self, table: &str, records: impl IntoIterator<Item = Record>) -> Result<()> {
        let mut sheets = self.lock();
        let sheet = sheet_mut(&mut sheets, table)?;

        for record in records {
            let row = sheet.encode(&record);
            sheet.rows.push(row);
        }

        Ok(())
    }

    /// Raw cells of a table, header first.
    pub fn cells(&self, table: &str) -> Result<Vec<Vec<String>>> {
        let sheets = self.lock();
        let sheet = sheets
            .get(table)
            .ok_or_else(|| err!("table `{table}` does not exist"))?;

        Ok(std::iter::once(sheet.header.clone())
            .chain(sheet.rows.iter().cloned())
            .collect())
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Sheet>> {
        self.sheets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn register_schema(&mut self, schemas: &Schemas) -> Result<()> {
        let mut sheets = self.lock();

        for (table, schema) in schemas {
            if sheets.contains_key(table) {
                continue;
            }

            tracing::debug!(%table, columns = schema.columns().len(), "creating sheet");

            sheets.insert(
                table.clone(),
                Sheet {
                    schema: schema.clone(),
                    header: schema.column_names().map(str::to_string).collect(),
                    rows: vec![],
                },
            );
        }

        Ok(())
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let mut sheets = self.lock();
        let sheet = sheet_mut(&mut sheets, op.table())?;

        match op {
            Operation::FetchTable(_) => Ok(Response::records(sheet.decode_all())),
            Operation::AppendRows(op) => sheet.append(op),
            Operation::UpdateRows(op) => sheet.update(op),
            Operation::DeleteRows(op) => sheet.delete(op),
            Operation::MaxNumericValue(op) => sheet.max(op),
        }
    }
}

fn sheet_mut<'a>(sheets: &'a mut IndexMap<String, Sheet>, table: &str) -> Result<&'a mut Sheet> {
    sheets
        .get_mut(table)
        .ok_or_else(|| err!("table `{table}` does not exist"))
}

impl Sheet {
    fn encode(&self, record: &Record) -> Vec<String> {
        self.schema
            .columns()
            .map(|(name, column)| coerce::to_cell(record::get(record, name), column))
            .collect()
    }

    fn decode(&self, cells: &[String]) -> Record {
        self.schema
            .columns()
            .enumerate()
            .map(|(i, (name, column))| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                (name.to_string(), coerce::from_cell(cell, column))
            })
            .collect()
    }

    fn decode_all(&self) -> Vec<Record> {
        self.rows.iter().map(|cells| self.decode(cells)).collect()
    }

    /// Position in `rows` of a 1-based store row.
    fn position(&self, row: usize) -> Result<usize> {
        if row < 2 || row - 2 >= self.rows.len() {
            return Err(err!(
                "row {row} is out of range for table `{}` ({} data rows)",
                self.schema.table,
                self.rows.len()
            ));
        }
        Ok(row - 2)
    }

    fn append(&mut self, op: AppendRows) -> Result<Response> {
        let count = op.rows.len() as u64;

        for record in &op.rows {
            let row = self.encode(record);
            self.rows.push(row);
        }

        Ok(Response::count(count))
    }

    fn update(&mut self, op: UpdateRows) -> Result<Response> {
        let positions = op
            .updates
            .iter()
            .map(|update| self.position(update.row))
            .collect::<Result<Vec<_>>>()?;

        for (position, update) in positions.into_iter().zip(&op.updates) {
            self.rows[position] = self.encode(&update.record);
        }

        Ok(Response::count(op.updates.len() as u64))
    }

    fn delete(&mut self, op: DeleteRows) -> Result<Response> {
        let mut positions = op
            .rows
            .iter()
            .map(|row| self.position(*row))
            .collect::<Result<Vec<_>>>()?;

        positions.sort_unstable();
        positions.dedup();

        for position in positions.iter().rev() {
            self.rows.remove(*position);
        }

        Ok(Response::count(positions.len() as u64))
    }

    fn max(&self, op: MaxNumericValue) -> Result<Response> {
        let Some((index, column)) = self
            .schema
            .columns()
            .enumerate()
            .find(|(_, (name, _))| *name == op.column)
            .map(|(index, (_, column))| (index, column))
        else {
            return Err(err!(
                "table `{}` has no column `{}`",
                op.table,
                op.column
            ));
        };

        let max = self
            .rows
            .iter()
            .filter_map(|cells| {
                let cell = cells.get(index).map(String::as_str).unwrap_or("");
                match coerce::from_cell(cell, column) {
                    Value::Number(n) if !n.is_nan() => Some(n),
                    _ => None,
                }
            })
            .fold(None, |max: Option<f64>, n| Some(max.map_or(n, |max| max.max(n))));

        Ok(Response::number(max.unwrap_or(0.0)))
    }
}
