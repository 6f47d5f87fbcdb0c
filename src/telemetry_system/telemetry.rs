use std::io::Write;

use serde::Serialize;

use crate::{control::launch_stages::Stage, errors::SimulationError};

/// One row of flight data: a stage's state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub id: u32,
    pub time: f64,
    pub pos_x: f64,
    pub pos_y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_r: f64,
    pub velocity_theta: f64,
    pub mass_fuel: f64,
    pub mass_structure: f64,
    pub drag_force_x: f64,
    pub drag_force_y: f64,
    pub drag_force_r: f64,
    pub drag_force_theta: f64,
    pub gravity_force_x: f64,
    pub gravity_force_y: f64,
    pub gravity_force_r: f64,
    pub gravity_force_theta: f64,
    pub lift_force_x: f64,
    pub lift_force_y: f64,
    pub lift_force_r: f64,
    pub lift_force_theta: f64,
    pub thrust_force_x: f64,
    pub thrust_force_y: f64,
    pub thrust_force_r: f64,
    pub thrust_force_theta: f64,
    pub atm_density: f64,
    pub atm_gravity: f64,
    pub atm_pressure: f64,
    pub atm_temperature: f64,
    pub atm_viscosity: f64,
}

const CSV_HEADER: &str = "id,time,pos_x,pos_y,velocity_x,velocity_y,velocity_r,velocity_theta,\
mass_fuel,mass_structure,\
drag_force_x,drag_force_y,drag_force_r,drag_force_theta,\
gravity_force_x,gravity_force_y,gravity_force_r,gravity_force_theta,\
lift_force_x,lift_force_y,lift_force_r,lift_force_theta,\
thrust_force_x,thrust_force_y,thrust_force_r,thrust_force_theta,\
atm_density,atm_gravity,atm_pressure,atm_temperature,atm_viscosity";

impl TelemetryRecord {
    pub fn capture(stage: &Stage, time: f64) -> Self {
        let position = stage.position();
        let velocity = stage.velocity();
        let forces = stage.forces();
        let atmosphere = stage.atmosphere();

        TelemetryRecord {
            id: stage.id(),
            time,
            pos_x: position.x(),
            pos_y: position.y(),
            velocity_x: velocity.x(),
            velocity_y: velocity.y(),
            velocity_r: velocity.r(),
            velocity_theta: velocity.theta(),
            mass_fuel: stage.fuel_mass(),
            mass_structure: stage.dry_mass(),
            drag_force_x: forces.drag.x(),
            drag_force_y: forces.drag.y(),
            drag_force_r: forces.drag.r(),
            drag_force_theta: forces.drag.theta(),
            gravity_force_x: forces.gravity.x(),
            gravity_force_y: forces.gravity.y(),
            gravity_force_r: forces.gravity.r(),
            gravity_force_theta: forces.gravity.theta(),
            lift_force_x: forces.lift.x(),
            lift_force_y: forces.lift.y(),
            lift_force_r: forces.lift.r(),
            lift_force_theta: forces.lift.theta(),
            thrust_force_x: forces.thrust.x(),
            thrust_force_y: forces.thrust.y(),
            thrust_force_r: forces.thrust.r(),
            thrust_force_theta: forces.thrust.theta(),
            atm_density: atmosphere.density,
            atm_gravity: atmosphere.gravity,
            atm_pressure: atmosphere.pressure,
            atm_temperature: atmosphere.temperature,
            atm_viscosity: atmosphere.viscosity,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity_r.abs()
    }

    fn write_csv_row<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let values = [
            self.time,
            self.pos_x,
            self.pos_y,
            self.velocity_x,
            self.velocity_y,
            self.velocity_r,
            self.velocity_theta,
            self.mass_fuel,
            self.mass_structure,
            self.drag_force_x,
            self.drag_force_y,
            self.drag_force_r,
            self.drag_force_theta,
            self.gravity_force_x,
            self.gravity_force_y,
            self.gravity_force_r,
            self.gravity_force_theta,
            self.lift_force_x,
            self.lift_force_y,
            self.lift_force_r,
            self.lift_force_theta,
            self.thrust_force_x,
            self.thrust_force_y,
            self.thrust_force_r,
            self.thrust_force_theta,
            self.atm_density,
            self.atm_gravity,
            self.atm_pressure,
            self.atm_temperature,
            self.atm_viscosity,
        ];

        write!(writer, "{}", self.id)?;
        for value in values {
            write!(writer, ",{}", value)?;
        }
        writeln!(writer)
    }
}

/// Append-only destination for telemetry rows.
pub trait TelemetrySink {
    fn record(&mut self, record: &TelemetryRecord) -> Result<(), SimulationError>;
}

/// Streams rows as CSV to any writer.
pub struct CsvTelemetry<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> CsvTelemetry<W> {
    pub fn new(mut writer: W) -> Result<Self, SimulationError> {
        writeln!(writer, "{}", CSV_HEADER)?;
        Ok(CsvTelemetry { writer, rows: 0 })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(mut self) -> Result<W, SimulationError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TelemetrySink for CsvTelemetry<W> {
    fn record(&mut self, record: &TelemetryRecord) -> Result<(), SimulationError> {
        record.write_csv_row(&mut self.writer)?;
        self.rows += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub record_count: usize,
    pub duration: f64,
    pub max_speed: f64,
    pub max_altitude: f64,
    pub remaining_fuel: f64,
    /// (stage id, time) of every tick in which a stage ran dry.
    pub burnouts: Vec<(u32, f64)>,
}

/// In-memory telemetry, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FlightLog {
    records: Vec<TelemetryRecord>,
}

impl FlightLog {
    pub fn new() -> Self {
        FlightLog {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn records_for(&self, id: u32) -> impl Iterator<Item = &TelemetryRecord> + '_ {
        self.records.iter().filter(move |record| record.id == id)
    }

    pub fn summary(&self) -> FlightSummary {
        let mut burnouts = Vec::new();
        let mut last_fuel: Vec<(u32, f64)> = Vec::new();

        for record in &self.records {
            match last_fuel.iter_mut().find(|(id, _)| *id == record.id) {
                Some((_, fuel)) => {
                    if *fuel > 0.0 && record.mass_fuel <= 0.0 {
                        burnouts.push((record.id, record.time));
                    }
                    *fuel = record.mass_fuel;
                }
                None => last_fuel.push((record.id, record.mass_fuel)),
            }
        }

        FlightSummary {
            record_count: self.records.len(),
            duration: self
                .records
                .iter()
                .map(|record| record.time)
                .fold(0.0, f64::max),
            max_speed: self
                .records
                .iter()
                .map(TelemetryRecord::speed)
                .fold(0.0, f64::max),
            max_altitude: self
                .records
                .iter()
                .map(|record| record.pos_y)
                .fold(f64::MIN, f64::max),
            remaining_fuel: last_fuel.iter().map(|(_, fuel)| *fuel).sum(),
            burnouts,
        }
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<W, SimulationError> {
        let mut csv = CsvTelemetry::new(writer)?;
        for record in &self.records {
            csv.record(record)?;
        }
        csv.into_inner()
    }

    fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_altitude(altitude: f64) -> String {
        if altitude >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    pub fn display_data(&self) {
        let summary = self.summary();

        println!("--- Simulation Summary ---");
        println!("Records: {}", summary.record_count);
        println!("Duration: {}", Self::format_time(summary.duration));
        println!("Max Velocity: {:.2} m/s", summary.max_speed);
        println!("Max Altitude: {}", Self::format_altitude(summary.max_altitude));
        println!("Remaining Fuel: {:.2} kg", summary.remaining_fuel);

        println!("\n--- Burnouts ---");
        if summary.burnouts.is_empty() {
            println!("No stage ran out of fuel.");
        }
        for (id, time) in &summary.burnouts {
            println!("Stage {} burned out at: {}", id, Self::format_time(*time));
        }
    }
}

impl TelemetrySink for FlightLog {
    fn record(&mut self, record: &TelemetryRecord) -> Result<(), SimulationError> {
        self.records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        control::launch_stages::StageParameters, trajectory_system::kinematics::KinematicState,
        utils::{position::Position, vector2d::Vector2D},
    };
    use std::f64::consts::FRAC_PI_2;

    fn create_test_stage(id: u32, fuel_mass: f64, altitude: f64, speed: f64) -> Stage {
        let state = KinematicState::new(
            Position::cartesian(0.0, altitude),
            Vector2D::new(0.0, speed),
            FRAC_PI_2,
        );
        Stage::new(id, StageParameters::default(), fuel_mass, state).unwrap()
    }

    #[test]
    fn test_capture_copies_stage_state() {
        let stage = create_test_stage(4, 1234.0, 100.0, 5.0);
        let record = TelemetryRecord::capture(&stage, 2.5);

        assert_eq!(record.id, 4);
        assert_eq!(record.time, 2.5);
        assert_eq!(record.pos_y, 100.0);
        assert_eq!(record.velocity_y, 5.0);
        assert_eq!(record.velocity_r, 5.0);
        assert_eq!(record.mass_fuel, 1234.0);
        assert_eq!(record.mass_structure, StageParameters::default().dry_mass);
        assert_eq!(record.atm_pressure, 101_325.0);
    }

    #[test]
    fn test_flight_log_keeps_insertion_order() {
        let mut log = FlightLog::new();
        for (id, time) in [(1, 0.0), (2, 0.0), (1, 1.0), (2, 1.0)] {
            let stage = create_test_stage(id, 10.0, 0.0, 0.0);
            log.record(&TelemetryRecord::capture(&stage, time)).unwrap();
        }

        let order: Vec<(u32, f64)> = log.records().iter().map(|r| (r.id, r.time)).collect();
        assert_eq!(order, vec![(1, 0.0), (2, 0.0), (1, 1.0), (2, 1.0)]);
        assert_eq!(log.records_for(2).count(), 2);
    }

    #[test]
    fn test_summary_tracks_extremes_and_burnouts() {
        let mut log = FlightLog::new();
        let samples = [(0.0, 100.0, 0.0, 0.0), (1.0, 40.0, 50.0, 20.0), (2.0, 0.0, 120.0, 35.0)];
        for (time, fuel, altitude, speed) in samples {
            let stage = create_test_stage(1, fuel, altitude, speed);
            log.record(&TelemetryRecord::capture(&stage, time)).unwrap();
        }

        let summary = log.summary();
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.duration, 2.0);
        assert_eq!(summary.max_speed, 35.0);
        assert_eq!(summary.max_altitude, 120.0);
        assert_eq!(summary.remaining_fuel, 0.0);
        assert_eq!(summary.burnouts, vec![(1, 2.0)]);
    }

    #[test]
    fn test_csv_output_has_header_and_rows() {
        let mut log = FlightLog::new();
        let stage = create_test_stage(1, 10.0, 0.0, 0.0);
        log.record(&TelemetryRecord::capture(&stage, 0.0)).unwrap();
        log.record(&TelemetryRecord::capture(&stage, 1.0)).unwrap();

        let bytes = log.write_csv(Vec::new()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1].split(',').count(),
            CSV_HEADER.split(',').count(),
            "Every row should have one value per column"
        );
        assert!(lines[2].starts_with("1,1,"));
    }

    #[test]
    fn test_csv_sink_counts_rows() {
        let mut sink = CsvTelemetry::new(Vec::new()).unwrap();
        let stage = create_test_stage(3, 10.0, 0.0, 0.0);
        sink.record(&TelemetryRecord::capture(&stage, 0.0)).unwrap();
        assert_eq!(sink.rows(), 1);
    }
}
