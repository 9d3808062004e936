//! Group rank and member count.

use robloxapi_core::{
    ApiError, ArgumentSpecification, ArgumentType, Arguments, DataSource, Result, SourceResolver,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{Derivation, DependentDataSource, field};

#[derive(Debug, Deserialize)]
struct GroupMembership {
    group: GroupRef,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct GroupRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct Role {
    name: String,
}

/// Name of a user's role in a group, from the user's group memberships.
///
/// Arguments: group ID, user ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupRank;

impl Derivation for GroupRank {
    fn dependency_args(&self, args: &Arguments) -> Arguments {
        Arguments::required_only([args.required(1)])
    }

    fn derive(&self, value: Value, args: &Arguments) -> Result<Value> {
        match &value {
            Value::Null => return Err(ApiError::NoData),
            Value::Array(memberships) if memberships.is_empty() => return Err(ApiError::NoData),
            Value::Array(_) => {}
            _ => return Err(ApiError::UnexpectedDataStructure),
        }

        let memberships: Vec<GroupMembership> =
            serde_json::from_value(value).map_err(|_| ApiError::UnexpectedDataStructure)?;
        let group_id = args.required(0).parse::<u64>().ok();

        memberships
            .into_iter()
            .find(|m| Some(m.group.id) == group_id)
            .map(|m| Value::String(m.role.name))
            .ok_or(ApiError::UserGroupNotFound)
    }
}

/// Member count of a group.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupMembers;

impl Derivation for GroupMembers {
    fn derive(&self, value: Value, _args: &Arguments) -> Result<Value> {
        field(value, "memberCount")
    }
}

/// Creates the `groupRank` data source on top of `groupRoles`.
///
/// # Errors
/// Returns [`ApiError::DataSourceNotFound`] if `groupRoles` is not registered.
pub fn group_rank(resolver: &dyn SourceResolver) -> Result<Arc<dyn DataSource>> {
    let dependency = resolver.resolve_or_fail("groupRoles")?;
    let spec = ArgumentSpecification::new([ArgumentType::GroupId, ArgumentType::UserId]);
    Ok(Arc::new(
        DependentDataSource::new("groupRank", spec, dependency, GroupRank).with_legacy_alias(),
    ))
}

/// Creates the `groupMembers` data source on top of `groupData`.
///
/// # Errors
/// Returns [`ApiError::DataSourceNotFound`] if `groupData` is not registered.
pub fn group_members(resolver: &dyn SourceResolver) -> Result<Arc<dyn DataSource>> {
    let dependency = resolver.resolve_or_fail("groupData")?;
    let spec = ArgumentSpecification::new([ArgumentType::GroupId]);
    Ok(Arc::new(
        DependentDataSource::new("groupMembers", spec, dependency, GroupMembers)
            .with_legacy_alias(),
    ))
}
