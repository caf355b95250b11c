//! Deterministische namen voor alle gegenereerde nodes.
//!
//! Namen worden alleen afgeleid, nooit gebruikt om iets terug te zoeken: de
//! builders geven elkaar `NodeId`s door.

/// `<prefix>_m_<model>_<nnn>` met een 1-gebaseerde index.
#[must_use]
pub fn segment(prefix: &str, model: &str, index: usize) -> String {
    format!("{prefix}_m_{model}_{:03}", index + 1)
}

/// `<prefix>_<nnn>` met een 1-gebaseerde index.
#[must_use]
pub fn indexed(prefix: &str, index: usize) -> String {
    format!("{prefix}_{:03}", index + 1)
}

/// Modelnaam met hoofdletter, voor namen als `CTRL_M_TentacleDrv_001`.
#[must_use]
pub fn capitalized(model: &str) -> String {
    let mut chars = model.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[must_use]
pub fn master_controller(model: &str) -> String {
    format!("CTRL_M_{}Drv_001", capitalized(model))
}

#[must_use]
pub fn end_controller(model: &str) -> String {
    format!("CTRL_M_{}Drv_End_001", capitalized(model))
}

#[must_use]
pub fn group_of(name: &str) -> String {
    format!("{name}_grp")
}

#[must_use]
pub fn zero_group_of(name: &str) -> String {
    format!("Zero_{name}")
}

#[must_use]
pub fn snap_of(target: &str) -> String {
    format!("snap_{target}")
}

#[must_use]
pub fn parent_of(child: &str) -> String {
    format!("parent_{child}")
}

#[must_use]
pub fn freeze_of(target: &str) -> String {
    format!("freeze_{target}")
}

#[must_use]
pub fn parent_constraint_of(driven: &str) -> String {
    format!("{driven}_parentConstraint1")
}

#[must_use]
pub fn scale_constraint_of(driven: &str) -> String {
    format!("{driven}_scaleConstraint1")
}
