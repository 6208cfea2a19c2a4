pub mod seaorm;

pub use seaorm::SeaOrmEventStore;
