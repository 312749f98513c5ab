pub mod procesos;
pub mod sensores;
pub mod subprocesos;
