pub mod verify_scheduler;
