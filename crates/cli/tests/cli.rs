use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn ccp_reports_cluster_for_a_tree_split() {
    let network = write_temp("r a\nr b\na leaf1\na leaf2\nb leaf3\n");
    let leaves = write_temp("leaf1\nleaf2\n");

    Command::cargo_bin("phylonet")
        .unwrap()
        .arg("ccp")
        .arg(network.path())
        .arg(leaves.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster"));
}

#[test]
fn ccp_reports_json_output() {
    let network = write_temp("r a\nr b\na leaf1\na leaf2\nb leaf3\n");
    let leaves = write_temp("leaf1\nleaf3\n");

    Command::cargo_bin("phylonet")
        .unwrap()
        .args(["--json", "ccp"])
        .arg(network.path())
        .arg(leaves.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is_cluster"));
}

#[test]
fn ccp_rejects_unknown_leaf() {
    let network = write_temp("r a\nr b\na leaf1\nb leaf2\n");
    let leaves = write_temp("leaf9\n");

    Command::cargo_bin("phylonet")
        .unwrap()
        .arg("ccp")
        .arg(network.path())
        .arg(leaves.path())
        .assert()
        .failure();
}

#[test]
fn srfd_reports_zero_for_identical_networks() {
    let network = write_temp("r a\nr b\na leaf1\na leaf2\nb leaf3\n");

    Command::cargo_bin("phylonet")
        .unwrap()
        .arg("srfd")
        .arg(network.path())
        .arg(network.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}
