//! Save path: gate a submission, clean its data, and write field values
//! back to storage.

use log::{debug, trace};
use serde_json::{Map, Value};

use super::{
    field_key, payload_key, token_field, token_scope, MetaboxDefinition, SaveOutcome, SkipReason,
    Submission, EDIT_CAPABILITY,
};
use crate::error::{FormError, Result};
use crate::factory::NodeFactory;
use crate::helpers::arrays;
use crate::hooks::MetaboxHooks;
use crate::node::Node;
use crate::security::{Capabilities, TokenProvider};
use crate::storage::{EntityId, MetaStorage};
use crate::upload::{UploadHandler, UploadedFile};

/// Process one submission.
///
/// The gate order is fixed: autosave and entity-kind mismatches are
/// silent no-ops; a missing or invalid token and a missing edit
/// capability abort loudly; a missing payload after a valid token is a
/// silent no-op again. Accepted data is stripped of empty values,
/// sanitized by the metabox, merged with upload references, filtered by
/// hooks, and finally written per field: sequences replace every stored
/// value under the key, scalars overwrite, and a field absent from the
/// data map has its stored values deleted — that is how cleared
/// checkboxes arrive.
#[allow(clippy::too_many_arguments)]
pub fn run<S, T, C, U, H>(
    metabox: &dyn MetaboxDefinition,
    factory: &NodeFactory,
    storage: &mut S,
    tokens: &T,
    capabilities: &C,
    uploads: &mut U,
    hooks: &H,
    submission: &Submission,
) -> Result<SaveOutcome>
where
    S: MetaStorage,
    T: TokenProvider,
    C: Capabilities,
    U: UploadHandler,
    H: MetaboxHooks,
{
    if submission.is_autosave {
        debug!("metabox {}: autosave, nothing to do", metabox.id());
        return Ok(SaveOutcome::Skipped(SkipReason::Autosave));
    }

    if submission.entity_kind != metabox.entity_kind() {
        debug!(
            "metabox {}: entity kind {} does not match {}",
            metabox.id(),
            submission.entity_kind,
            metabox.entity_kind()
        );
        return Ok(SaveOutcome::Skipped(SkipReason::EntityKindMismatch));
    }

    let token = submission
        .payload
        .get(&token_field(metabox.id()))
        .and_then(Value::as_str)
        .unwrap_or_default();
    if token.is_empty() || !tokens.verify(token, &token_scope(metabox.id())) {
        return Err(FormError::InvalidSecurityToken(metabox.title().to_string()));
    }
    if !capabilities.actor_can(EDIT_CAPABILITY, submission.entity_id) {
        return Err(FormError::PermissionDenied);
    }

    let raw = match submission
        .payload
        .get(&payload_key(metabox.id()))
        .and_then(Value::as_object)
    {
        Some(raw) => raw,
        None => {
            debug!("metabox {}: no payload submitted", metabox.id());
            return Ok(SaveOutcome::Skipped(SkipReason::NoPayload));
        }
    };

    let data = arrays::filter_recursive_map(raw);
    let data = metabox.sanitize(data);
    let data = merge_uploads(data, uploads, &submission.files)?;

    let data = hooks.filter_data(metabox.id(), data);
    hooks.before_update(metabox.id(), &data, submission.entity_id);

    let mut fields_written = 0;
    for field in metabox.fields(factory)? {
        fields_written += write_field(metabox, storage, submission.entity_id, &field, &data)?;
    }

    hooks.after_update(metabox.id(), &data, submission.entity_id);
    Ok(SaveOutcome::Saved { fields_written })
}

/// Run every submitted file through the upload collaborator and merge the
/// resulting references into the data map under the file's field name.
/// Any upload error is fatal to the submission.
fn merge_uploads<U: UploadHandler>(
    mut data: Map<String, Value>,
    uploads: &mut U,
    files: &[UploadedFile],
) -> Result<Map<String, Value>> {
    for file in files {
        let reference = uploads.handle_upload(file).map_err(|e| match e {
            FormError::Upload(message) => FormError::Upload(message),
            other => FormError::Upload(other.to_string()),
        })?;
        data.insert(file.field.clone(), reference);
    }
    Ok(data)
}

/// Write one field's value, recursing into groupings. Returns how many
/// leaf fields were written (deletes included).
fn write_field<S: MetaStorage>(
    metabox: &dyn MetaboxDefinition,
    storage: &mut S,
    entity_id: EntityId,
    field: &Node,
    data: &Map<String, Value>,
) -> Result<usize> {
    if field.is_group() {
        let mut written = 0;
        for child in field.children() {
            written += write_field(metabox, storage, entity_id, child, data)?;
        }
        return Ok(written);
    }

    let name = match field.name() {
        Some(name) => name,
        None => return Ok(0),
    };
    let key = field_key(metabox.id(), name);

    match data.get(name) {
        Some(Value::Array(items)) => {
            trace!("metabox {}: replacing {} values under {}", metabox.id(), items.len(), key);
            storage.delete_values(entity_id, &key)?;
            for item in items {
                storage.add_value(entity_id, &key, item.clone())?;
            }
        }
        Some(value) => {
            trace!("metabox {}: writing {}", metabox.id(), key);
            storage.set_single_value(entity_id, &key, value.clone())?;
        }
        None => {
            trace!("metabox {}: clearing {}", metabox.id(), key);
            storage.delete_values(entity_id, &key)?;
        }
    }
    Ok(1)
}
