//! In-memory ridership database shared by unit tests.

use rusqlite::{params, Connection};

use super::Storage;

/// Days in January 2019 that both Addison and Belmont report
pub const DAYS_2019: usize = 14;

pub const STATION_COUNT: i64 = 17;

/// Date of the Addison entry with no rider count in [`storage_with_missing_riders`]
pub const MISSING_RIDERS_DATE: &str = "2019-03-01";

/// Twelve of these contain an "a" (case-insensitive), five do not
const STATIONS: &[(i64, &str)] = &[
    (30091, "Addison"),
    (30255, "Belmont"),
    (30074, "Clark/Lake"),
    (30116, "Damen"),
    (30076, "Harlem"),
    (30109, "Jackson"),
    (30198, "Lake"),
    (30211, "Monroe"),
    (30064, "Grand"),
    (30017, "Sheridan"),
    (30141, "Washington"),
    (30253, "Paulina"),
    (30188, "Cicero"),
    (30025, "Oak Park"),
    (30176, "Howard"),
    (30160, "Rosemont"),
    (30007, "Quincy"),
];

const SCHEMA: &str = "
    CREATE TABLE Stations (Station_ID INTEGER PRIMARY KEY, Station_Name TEXT NOT NULL);
    CREATE TABLE Stops (Stop_ID INTEGER PRIMARY KEY, Station_ID INTEGER, Stop_Name TEXT);
    CREATE TABLE Ridership (
        Station_ID INTEGER,
        Ride_Date TEXT,
        Type_of_Day TEXT,
        Num_Riders INTEGER
    );
";

const DAY_TYPES: [&str; 3] = ["W", "A", "U"];

fn ride(conn: &Connection, station_id: i64, date: &str, riders: Option<i64>, seq: usize) {
    conn.execute(
        "INSERT INTO Ridership (Station_ID, Ride_Date, Type_of_Day, Num_Riders) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            station_id,
            format!("{date} 00:00:00.000"),
            DAY_TYPES[seq % DAY_TYPES.len()],
            riders
        ],
    )
    .unwrap();
}

/// Create the schema without any rows
pub fn create_schema(conn: &Connection) {
    conn.execute_batch(SCHEMA).unwrap();
}

/// Create the schema and fill it with the fixture rows
pub fn seed(conn: &Connection) {
    create_schema(conn);

    for (id, name) in STATIONS {
        conn.execute(
            "INSERT INTO Stations (Station_ID, Station_Name) VALUES (?1, ?2)",
            params![id, name],
        )
        .unwrap();
    }
    for (stop_id, station_id, name) in [
        (1, 30091, "Addison (O'Hare-bound)"),
        (2, 30091, "Addison (Forest Park-bound)"),
        (3, 30255, "Belmont (Kimball-bound)"),
    ] {
        conn.execute(
            "INSERT INTO Stops (Stop_ID, Station_ID, Stop_Name) VALUES (?1, ?2, ?3)",
            params![stop_id, station_id, name],
        )
        .unwrap();
    }

    let mut seq = 0;
    let mut next = || {
        seq += 1;
        seq
    };

    // Addison: Jan 1..=14, with a second entry on Jan 1
    for day in 1..=DAYS_2019 {
        let date = format!("2019-01-{day:02}");
        ride(conn, 30091, &date, Some(1000 + day as i64 * 10), next());
    }
    ride(conn, 30091, "2019-01-01", Some(50), next());

    // Belmont: Jan 1..=15
    for day in 1..=DAYS_2019 + 1 {
        let date = format!("2019-01-{day:02}");
        ride(conn, 30255, &date, Some(2000 + day as i64 * 10), next());
    }

    // Damen: only three days
    for day in 2..=4 {
        let date = format!("2019-01-{day:02}");
        ride(conn, 30116, &date, Some(300 + day), next());
    }

    // Neighbouring years must never leak into 2019
    ride(conn, 30091, "2018-12-31", Some(777), next());
    ride(conn, 30091, "2020-01-01", Some(888), next());
}

pub fn storage() -> Storage {
    let conn = Connection::open_in_memory().unwrap();
    seed(&conn);
    Storage::from_connection(conn)
}

/// The standard fixture plus an Addison date whose only entry has NULL riders
pub fn storage_with_missing_riders() -> Storage {
    let conn = Connection::open_in_memory().unwrap();
    seed(&conn);
    ride(&conn, 30091, MISSING_RIDERS_DATE, None, 0);
    Storage::from_connection(conn)
}

/// Stations table without a name column: stats work, station lookups fail
pub fn storage_without_station_names() -> Storage {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&SCHEMA.replace("Station_Name TEXT NOT NULL", "Name TEXT NOT NULL"))
        .unwrap();
    Storage::from_connection(conn)
}

pub fn empty_storage() -> Storage {
    let conn = Connection::open_in_memory().unwrap();
    create_schema(&conn);
    Storage::from_connection(conn)
}
