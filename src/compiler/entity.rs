use crate::{
    ast::{EntityBody, InsertStatement, UpdateStatement},
    convert::json_to_value,
    error::QueryError,
    observer::NameObserver,
    query::{EntityPayload, InsertQuery, UpdateQuery},
    resolver::Resolver,
    ttl,
    value::Value,
};

fn compile_payload(
    entity: &str,
    body: &EntityBody,
    observer: &dyn NameObserver,
    resolver: &mut Resolver<'_>,
) -> Result<EntityPayload, QueryError> {
    let mut fields: Vec<(String, Value)> = Vec::new();

    let mut push = |name: String, value: Value| {
        if fields.iter().any(|(n, _)| *n == name) {
            return Err(QueryError::InvalidValue(format!(
                "field '{name}' is assigned more than once"
            )));
        }
        fields.push((name, value));
        Ok(())
    };

    match body {
        EntityBody::Assignments(assignments) => {
            for assignment in assignments {
                let name = observer.resolve_field(entity, assignment.field.name());
                push(name, resolver.resolve(&assignment.value)?)?;
            }
        }
        EntityBody::Json(serde_json::Value::Object(members)) => {
            for (key, value) in members {
                let name = observer.resolve_field(entity, key);
                push(name, json_to_value(value.clone()))?;
            }
        }
        EntityBody::Json(other) => {
            return Err(QueryError::InvalidValue(format!(
                "entity body must be a JSON object, got {other}"
            )));
        }
    }

    Ok(EntityPayload {
        entity: observer.resolve_entity(entity),
        fields,
    })
}

pub fn compile_insert(
    statement: &InsertStatement,
    observer: &dyn NameObserver,
    resolver: &mut Resolver<'_>,
) -> Result<InsertQuery, QueryError> {
    let payload = compile_payload(statement.entity.name(), &statement.body, observer, resolver)?;
    let ttl = statement.ttl.as_ref().map(ttl::resolve).transpose()?;
    Ok(InsertQuery { payload, ttl })
}

pub fn compile_update(
    statement: &UpdateStatement,
    observer: &dyn NameObserver,
    resolver: &mut Resolver<'_>,
) -> Result<UpdateQuery, QueryError> {
    let payload = compile_payload(statement.entity.name(), &statement.body, observer, resolver)?;
    Ok(UpdateQuery { payload })
}
