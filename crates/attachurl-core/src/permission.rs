//! Yes/no edit checks for a record and attachment field.

use crate::model::{AttachmentField, Record};

/// Host-provided permission queries.
pub trait EditAccess {
    /// Role check on the field definition alone.
    fn field_editable(&self, field: &AttachmentField) -> bool;

    /// Whether `field` may be edited on `record` (record access plus field access).
    fn record_field_editable(&self, record: &Record, field: &AttachmentField) -> bool;
}

/// Role-based access for the current user.
#[derive(Debug, Clone, Default)]
pub struct RoleAccess {
    pub roles: Vec<String>,
    /// Bypasses every role restriction.
    pub superuser: bool,
    /// Whether the user may edit records at all.
    pub can_edit_records: bool,
}

impl RoleAccess {
    pub fn editor(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            superuser: false,
            can_edit_records: true,
        }
    }

    pub fn superuser() -> Self {
        Self {
            roles: Vec::new(),
            superuser: true,
            can_edit_records: true,
        }
    }
}

impl EditAccess for RoleAccess {
    fn field_editable(&self, field: &AttachmentField) -> bool {
        self.superuser || field.edit_roles.iter().any(|r| self.roles.contains(r))
    }

    fn record_field_editable(&self, _record: &Record, field: &AttachmentField) -> bool {
        if self.superuser {
            return true;
        }
        self.can_edit_records && (!field.use_roles || self.field_editable(field))
    }
}

/// Decides whether URL ingestion may touch a record's field.
pub struct EditPermissionGate<'a, A: EditAccess + ?Sized> {
    access: &'a A,
}

impl<'a, A: EditAccess + ?Sized> EditPermissionGate<'a, A> {
    pub fn new(access: &'a A) -> Self {
        Self { access }
    }

    /// For a record nested in a container field, both the field and the
    /// container field must be unrestricted or editable by role; otherwise the
    /// record-level query decides. `container_field` is the nested record's
    /// container definition (ignored for top-level records).
    pub fn can_edit(
        &self,
        record: &Record,
        field: &AttachmentField,
        container_field: Option<&AttachmentField>,
    ) -> bool {
        if record.is_nested() {
            let Some(container_field) = container_field else {
                return false;
            };
            self.role_ok(field) && self.role_ok(container_field)
        } else {
            self.access.record_field_editable(record, field)
        }
    }

    fn role_ok(&self, field: &AttachmentField) -> bool {
        !field.use_roles || self.access.field_editable(field)
    }
}
