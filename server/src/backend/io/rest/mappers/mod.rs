pub mod reminder_mapper;
