use std::io::Read;

type SourceRows = (Vec<String>, Vec<Vec<String>>);

/// Header row plus every data row as trimmed strings. Rows may be shorter than
/// the header; missing cells read as empty.
pub(crate) fn read_rows<R: Read>(reader: R) -> Result<SourceRows, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok((headers, rows))
}
