//! Registration of the vector scalar functions on a SQLite connection.

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::{Value, ValueRef};
use rusqlite::Connection;
use sqlvec_core::{FunctionOutput, SqlValue, VectorError, VectorFunction};
use tracing::debug;

/// Convert a SQLite argument into a host value.
///
/// Text that is not valid UTF-8 is rejected as invalid input.
pub(crate) fn sql_value(value: ValueRef<'_>) -> Result<SqlValue<'_>, VectorError> {
    Ok(match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(r) => SqlValue::Real(r),
        ValueRef::Text(bytes) => SqlValue::Text(
            std::str::from_utf8(bytes)
                .map_err(|_| VectorError::invalid_input("text is not valid UTF-8"))?,
        ),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes),
    })
}

fn to_sql(output: FunctionOutput) -> Value {
    match output {
        FunctionOutput::Blob(bytes) => Value::Blob(bytes),
        FunctionOutput::Text(text) => Value::Text(text),
        FunctionOutput::Real(r) => Value::Real(r),
    }
}

fn invoke(function: VectorFunction, ctx: &Context<'_>) -> rusqlite::Result<Value> {
    let args = (0..ctx.len())
        .map(|i| sql_value(ctx.get_raw(i)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))?;

    function
        .call(&args)
        .map(to_sql)
        .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))
}

/// Register `vector`, `vector_extract` and `vector_distance_cos` on `conn`.
///
/// All three are deterministic. Errors surface as SQL errors carrying the
/// vector error message unchanged.
pub fn register_vector_functions(conn: &Connection) -> rusqlite::Result<()> {
    for function in VectorFunction::ALL {
        debug!("Registering {}()", function.name());
        conn.create_scalar_function(
            function.name(),
            function.arity() as i32,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            move |ctx| invoke(function, ctx),
        )?;
    }
    Ok(())
}
