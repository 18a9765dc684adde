// libs/chat-cell/src/services/channel.rs
use appointment_cell::Appointment;

use crate::models::ChatChannel;

pub const CHANNEL_TYPE: &str = "messaging";

/// Deterministic channel id for an appointment conversation. Characters the
/// chat service rejects in ids are replaced with `_`.
pub fn channel_id_for(appointment_id: &str) -> String {
    let safe: String = appointment_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("appointment-{}", safe)
}

pub fn appointment_channel(appointment: &Appointment) -> ChatChannel {
    let mut members = vec![appointment.patient_id.clone(), appointment.doctor_id.clone()];
    members.dedup();

    ChatChannel {
        channel_type: CHANNEL_TYPE.to_string(),
        channel_id: channel_id_for(&appointment.id),
        appointment_id: appointment.id.clone(),
        members,
    }
}
