#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const S1010: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<eSocial xmlns="http://www.esocial.gov.br/schema/evt/evtTabRubrica/v_S_01_02_00">
  <evtTabRubrica Id="ID1123456780000002024030112000000001">
    <ideEvento><tpAmb>1</tpAmb><procEmi>1</procEmi><verProc>folha-2.3</verProc></ideEvento>
    <ideEmpregador><tpInsc>1</tpInsc><nrInsc>12345678</nrInsc></ideEmpregador>
    <infoRubrica>
      <inclusao>
        <ideRubrica><codRubr>1000</codRubr><ideTabRubr>GERAL</ideTabRubr><iniValid>2024-01</iniValid></ideRubrica>
        <dadosRubrica><dscRubr>Salário base</dscRubr><natRubr>1000</natRubr><tpRubr>1</tpRubr>
          <codIncCP>11</codIncCP><codIncIRRF>11</codIncIRRF><codIncFGTS>11</codIncFGTS></dadosRubrica>
      </inclusao>
      <inclusao>
        <ideRubrica><codRubr>5000</codRubr><ideTabRubr>GERAL</ideTabRubr><iniValid>2024-01</iniValid></ideRubrica>
        <dadosRubrica><dscRubr>Aviso prévio indenizado</dscRubr><natRubr>6001</natRubr><tpRubr>1</tpRubr>
          <codIncCP>00</codIncCP><codIncIRRF>00</codIncIRRF><codIncFGTS>11</codIncFGTS></dadosRubrica>
      </inclusao>
      <exclusao>
        <ideRubrica><codRubr>9000</codRubr><ideTabRubr>GERAL</ideTabRubr><iniValid>2020-01</iniValid><fimValid>2023-12</fimValid></ideRubrica>
      </exclusao>
    </infoRubrica>
  </evtTabRubrica>
</eSocial>"#;

pub const S1200: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<es:eSocial xmlns:es="http://www.esocial.gov.br/schema/evt/evtRemun/v_S_01_02_00">
  <es:evtRemun Id="ID1123456780000002024040112000000002">
    <es:ideEvento><es:indRetif>1</es:indRetif><es:perApur>2024-03</es:perApur><es:tpAmb>1</es:tpAmb></es:ideEvento>
    <es:ideTrabalhador><es:cpfTrab>123</es:cpfTrab></es:ideTrabalhador>
    <es:dmDev>
      <es:ideDmDev>FOLHA-03</es:ideDmDev><es:codCateg>101</es:codCateg>
      <es:infoPerApur><es:ideEstabLot>
        <es:tpInsc>1</es:tpInsc><es:nrInsc>12345678000190</es:nrInsc><es:codLotacao>LOT-SP</es:codLotacao>
        <es:remunPerApur><es:matricula>42</es:matricula>
          <es:itensRemun><es:codRubr>1000</es:codRubr><es:ideTabRubr>GERAL</es:ideTabRubr><es:vrRubr>3500.00</es:vrRubr><es:indApurIR>0</es:indApurIR></es:itensRemun>
          <es:itensRemun><es:codRubr>7777</es:codRubr><es:ideTabRubr>GERAL</es:ideTabRubr><es:qtdRubr>2</es:qtdRubr><es:vrRubr>80,00</es:vrRubr><es:indApurIR>0</es:indApurIR></es:itensRemun>
        </es:remunPerApur>
      </es:ideEstabLot></es:infoPerApur>
    </es:dmDev>
  </es:evtRemun>
</es:eSocial>"#;

pub const S2299: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<eSocial xmlns="http://www.esocial.gov.br/schema/evt/evtDeslig/v_S_01_02_00">
  <evtDeslig Id="ID1123456780000002024031512000000003">
    <ideEvento><indRetif>1</indRetif><tpAmb>1</tpAmb></ideEvento>
    <ideVinculo><cpfTrab>123</cpfTrab><matricula>42</matricula></ideVinculo>
    <infoDeslig>
      <mtvDeslig>02</mtvDeslig><dtDeslig>2024-03-15</dtDeslig>
      <verbasResc>
        <dmDev><ideDmDev>RESC-01</ideDmDev><codCateg>101</codCateg>
          <infoPerApur><ideEstabLot><codLotacao>LOT-SP</codLotacao>
            <detVerbas><codRubr>5000</codRubr><ideTabRubr>GERAL</ideTabRubr><vrRubr>3500.00</vrRubr><indApurIR>0</indApurIR></detVerbas>
          </ideEstabLot></infoPerApur>
        </dmDev>
      </verbasResc>
    </infoDeslig>
  </evtDeslig>
</eSocial>"#;

pub fn write_fixture(dir: &Path, name: &str, content: &str) -> String {
    let path: PathBuf = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

pub fn read_member(zip_path: &Path, name: &str) -> String {
    let data = std::fs::read(zip_path).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    std::io::Read::read_to_string(&mut file, &mut content).unwrap();
    content
}

pub fn member_names(zip_path: &Path) -> Vec<String> {
    let data = std::fs::read(zip_path).unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
    archive.file_names().map(|n| n.to_string()).collect()
}
