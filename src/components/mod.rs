pub mod particle_field;
