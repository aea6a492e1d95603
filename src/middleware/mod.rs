pub mod bucket_gate;
