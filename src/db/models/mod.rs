pub mod activity;
pub mod appointment;
pub mod contact;
pub mod medication;

pub use activity::{Activity, ActivityInput, ACTIVITY_TYPES};
pub use appointment::{Appointment, AppointmentInput};
pub use contact::{Contact, ContactInput};
pub use medication::{Medication, MedicationInput};
